use crate::catalog;
use crate::errors::AppError;
use crate::models::{Tracker, WeekIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One user interaction with the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    SelectWeek { week: WeekIndex },
    SetProgress { unit: String, memorized: i64 },
    SetReflection { text: String },
    ViewWeek { week: WeekIndex },
}

/// Flat shape of the HTML forms; urlencoded bodies cannot carry a tagged enum.
#[derive(Debug, Deserialize)]
pub struct EventForm {
    pub kind: String,
    pub week: Option<u8>,
    pub unit: Option<String>,
    pub memorized: Option<i64>,
    pub text: Option<String>,
}

/// Body of the export buttons, which sit in the reflection form so the
/// text being edited travels with the export request.
#[derive(Debug, Default, Deserialize)]
pub struct ExportForm {
    pub text: Option<String>,
}

impl ExportForm {
    pub fn into_event(self) -> Option<Event> {
        self.text.map(|text| Event::SetReflection { text })
    }
}

impl TryFrom<EventForm> for Event {
    type Error = AppError;

    fn try_from(form: EventForm) -> Result<Self, Self::Error> {
        let week = || -> Result<WeekIndex, AppError> {
            let raw = form
                .week
                .ok_or_else(|| AppError::bad_request("missing week"))?;
            WeekIndex::try_from(raw).map_err(AppError::bad_request)
        };

        match form.kind.trim() {
            "select_week" => Ok(Event::SelectWeek { week: week()? }),
            "view_week" => Ok(Event::ViewWeek { week: week()? }),
            "set_progress" => Ok(Event::SetProgress {
                unit: form
                    .unit
                    .clone()
                    .ok_or_else(|| AppError::bad_request("missing unit"))?,
                memorized: form
                    .memorized
                    .ok_or_else(|| AppError::bad_request("missing memorized"))?,
            }),
            "set_reflection" => Ok(Event::SetReflection {
                text: form.text.clone().unwrap_or_default(),
            }),
            other => Err(AppError::bad_request(format!("unknown event kind '{other}'"))),
        }
    }
}

impl Tracker {
    pub fn apply(&mut self, event: Event) -> Result<(), AppError> {
        debug!(?event, "applying event");
        match event {
            Event::SelectWeek { week } => self.current_week = week,
            Event::ViewWeek { week } => self.history_week = week,
            Event::SetReflection { text } => self.reflections.set(self.current_week, text),
            Event::SetProgress { unit, memorized } => {
                let unit = catalog::find(&unit)
                    .ok_or_else(|| AppError::bad_request(format!("unknown unit '{unit}'")))?;
                // the slider's range is the only validation
                let value = memorized.clamp(0, i64::from(unit.total_items)) as u32;
                self.progress.set(self.current_week, unit, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: &str) -> EventForm {
        EventForm {
            kind: kind.to_string(),
            week: None,
            unit: None,
            memorized: None,
            text: None,
        }
    }

    #[test]
    fn progress_lands_in_current_week() {
        let mut tracker = Tracker::default();
        tracker
            .apply(Event::SelectWeek { week: WeekIndex::new(3).unwrap() })
            .unwrap();
        tracker
            .apply(Event::SetProgress { unit: "Yaseen".into(), memorized: 12 })
            .unwrap();

        let yaseen = catalog::find("Yaseen").unwrap();
        assert_eq!(tracker.progress.get(WeekIndex::new(3).unwrap(), yaseen), 12);
        assert_eq!(tracker.progress.get(WeekIndex::new(1).unwrap(), yaseen), 0);
    }

    #[test]
    fn slider_values_are_clamped() {
        let mut tracker = Tracker::default();
        tracker
            .apply(Event::SetProgress { unit: "Al-Hujurat".into(), memorized: 500 })
            .unwrap();
        tracker
            .apply(Event::SetProgress { unit: "An-Noor".into(), memorized: -3 })
            .unwrap();

        let week = WeekIndex::default();
        assert_eq!(tracker.progress.get(week, catalog::find("Al-Hujurat").unwrap()), 18);
        assert_eq!(tracker.progress.get(week, catalog::find("An-Noor").unwrap()), 0);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let mut tracker = Tracker::default();
        let err = tracker
            .apply(Event::SetProgress { unit: "Al-Fatiha".into(), memorized: 1 })
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn reflection_follows_selected_week() {
        let mut tracker = Tracker::default();
        tracker.apply(Event::SetReflection { text: "week one".into() }).unwrap();
        tracker
            .apply(Event::SelectWeek { week: WeekIndex::new(2).unwrap() })
            .unwrap();
        assert_eq!(tracker.current_reflection(), "");
        tracker.apply(Event::SetReflection { text: "week two".into() }).unwrap();

        assert_eq!(tracker.reflections.get(WeekIndex::new(1).unwrap()), "week one");
        assert_eq!(tracker.current_reflection(), "week two");
    }

    #[test]
    fn form_conversion() {
        let mut select = form("select_week");
        select.week = Some(4);
        assert_eq!(
            Event::try_from(select).unwrap(),
            Event::SelectWeek { week: WeekIndex::new(4).unwrap() }
        );

        let mut bad_week = form("view_week");
        bad_week.week = Some(9);
        assert!(Event::try_from(bad_week).is_err());

        assert!(Event::try_from(form("set_progress")).is_err());
        assert!(Event::try_from(form("explode")).is_err());
    }

    #[test]
    fn export_form_carries_reflection() {
        let form = ExportForm { text: Some("late edit".into()) };
        assert_eq!(
            form.into_event(),
            Some(Event::SetReflection { text: "late edit".into() })
        );
        assert_eq!(ExportForm::default().into_event(), None);
    }

    #[test]
    fn json_events_use_kind_tag() {
        let event: Event =
            serde_json::from_str(r#"{"kind":"set_progress","unit":"Yusuf","memorized":5}"#)
                .unwrap();
        assert_eq!(event, Event::SetProgress { unit: "Yusuf".into(), memorized: 5 });
        assert!(serde_json::from_str::<Event>(r#"{"kind":"select_week","week":0}"#).is_err());
    }
}
