use crate::catalog::{self, Unit};
use crate::models::{
    ChartBar, HistoryView, NoticeKind, PageView, ProgressStore, TierView, Tracker, UnitRow,
    WeekIndex,
};

pub fn unit_total(progress: &ProgressStore, unit: &Unit) -> u32 {
    WeekIndex::ALL
        .iter()
        .map(|week| progress.get(*week, unit))
        .fold(0u32, u32::saturating_add)
}

/// Not clamped: per-week counts summed over four weeks can pass the total.
pub fn unit_percent(progress: &ProgressStore, unit: &Unit) -> f64 {
    f64::from(unit_total(progress, unit)) / f64::from(unit.total_items)
}

pub fn overall_achievement(progress: &ProgressStore) -> f64 {
    let memorized: u64 = catalog::UNITS
        .iter()
        .map(|unit| u64::from(unit_total(progress, unit)))
        .sum();
    memorized as f64 / f64::from(catalog::total_items())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Beginning,
    Progressing,
    Focused,
    Finishing,
}

impl Tier {
    pub fn classify(level: f64) -> Self {
        if level < 0.25 {
            Tier::Beginning
        } else if level < 0.5 {
            Tier::Progressing
        } else if level < 0.75 {
            Tier::Focused
        } else {
            Tier::Finishing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Beginning => "beginning",
            Tier::Progressing => "progressing",
            Tier::Focused => "focused",
            Tier::Finishing => "finishing",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Beginning => "Every beginning is challenging - you're building momentum!",
            Tier::Progressing => {
                "You're making progress! Remember: consistent effort beats perfection"
            }
            Tier::Focused => "Amazing focus! Keep up the strategic work",
            Tier::Finishing => "You're almost there! Maintain your consistent practice",
        }
    }

    pub fn kind(self) -> NoticeKind {
        match self {
            Tier::Beginning => NoticeKind::Warning,
            Tier::Progressing => NoticeKind::Info,
            Tier::Focused | Tier::Finishing => NoticeKind::Success,
        }
    }

    pub fn celebrate(self) -> bool {
        self == Tier::Finishing
    }
}

pub fn build_view(tracker: &Tracker) -> PageView {
    let week = tracker.current_week;

    let units = tracker
        .progress
        .week_rows(week)
        .into_iter()
        .map(|(unit, memorized)| UnitRow {
            name: unit.name.to_string(),
            total_items: unit.total_items,
            memorized,
            percent: f64::from(memorized) / f64::from(unit.total_items),
        })
        .collect();

    let chart = catalog::UNITS
        .iter()
        .map(|unit| ChartBar {
            name: unit.name.to_string(),
            total: unit_total(&tracker.progress, unit),
            percent: unit_percent(&tracker.progress, unit),
        })
        .collect();

    let achievement = overall_achievement(&tracker.progress);
    let tier = Tier::classify(achievement);

    PageView {
        week: week.get(),
        units,
        chart,
        reflection: tracker.current_reflection().to_string(),
        achievement,
        tier: TierView {
            label: tier.label().to_string(),
            message: tier.message().to_string(),
            kind: tier.kind(),
            celebrate: tier.celebrate(),
        },
        history: HistoryView {
            week: tracker.history_week.get(),
            entries: tracker.progress.week_entries(tracker.history_week),
        },
        notice: tracker.notice.clone(),
        saved: tracker.saved.clone(),
    }
}

/// Builds the view and consumes the one-shot notice and saved record.
pub fn render_pass(tracker: &mut Tracker) -> PageView {
    let view = build_view(tracker);
    tracker.notice = None;
    tracker.saved = None;
    view
}
