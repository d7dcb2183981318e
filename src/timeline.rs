use crate::model::Activity;

/// Activities scheduled within one hour of the day.
#[derive(Debug)]
pub struct HourSlot<'a> {
    pub hour: u32,
    pub activities: Vec<&'a Activity>,
}

impl HourSlot<'_> {
    pub fn label(&self) -> String {
        hour_label(self.hour)
    }
}

/// The day split into 24 hour slots.
#[derive(Debug)]
pub struct Timeline<'a> {
    pub slots: Vec<HourSlot<'a>>,
    /// Activities whose time could not be read.
    pub unscheduled: Vec<&'a Activity>,
}

impl<'a> Timeline<'a> {
    pub fn of(activities: &'a [Activity]) -> Self {
        let mut slots: Vec<HourSlot> = (0..24)
            .map(|hour| HourSlot {
                hour,
                activities: Vec::new(),
            })
            .collect();
        let mut unscheduled = Vec::new();

        for activity in activities {
            match activity.hour() {
                Some(hour) => slots[hour as usize].activities.push(activity),
                None => unscheduled.push(activity),
            }
        }
        Timeline { slots, unscheduled }
    }
}

/// "12 AM", "9 AM", "12 PM", "7 PM".
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{} AM", hour),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

/// Activities in the order of their scheduled time. Ties keep insertion order.
pub fn by_time(activities: &[Activity]) -> Vec<&Activity> {
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by(|a, b| a.time.cmp(&b.time));
    sorted
}
