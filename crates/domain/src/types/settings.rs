//! User settings and the policy derived from them

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::slot::{Thresholds, WorkWindow};
use crate::constants::{
    DEFAULT_END_OF_DAY, DEFAULT_FOCUS_STRING, DEFAULT_FREE_SLOTS, DEFAULT_LOOKAHEAD_DAYS,
    DEFAULT_START_OF_DAY, DEFAULT_TIME_ZONE, DEFAULT_WINDOW_SIZE,
};
use crate::errors::{FocusError, Result};
use crate::impl_domain_keyword_conversions;

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    #[serde(with = "hhmm")]
    pub start_of_day: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_of_day: NaiveTime,
    /// Free half-hour slots wanted inside the work window.
    pub free_slots: i64,
    pub lookahead_days: u32,
    /// Subject that marks entries created by this tool.
    pub focus_string: String,
    /// Run a reconciliation pass every hour.
    pub each_hour: bool,
    /// IANA zone the calendar's wall-clock times are expressed in.
    pub time_zone: String,
    pub window_pos: Option<WindowPosition>,
    pub window_size: WindowSize,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            start_of_day: hm(DEFAULT_START_OF_DAY),
            end_of_day: hm(DEFAULT_END_OF_DAY),
            free_slots: DEFAULT_FREE_SLOTS,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            focus_string: DEFAULT_FOCUS_STRING.to_string(),
            each_hour: false,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            window_pos: None,
            window_size: WindowSize { width: DEFAULT_WINDOW_SIZE.0, height: DEFAULT_WINDOW_SIZE.1 },
        }
    }
}

fn hm((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Last known main window position, kept for front ends that have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Individually editable settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    StartOfDay,
    EndOfDay,
    FreeSlots,
    LookaheadDays,
    FocusString,
    EachHour,
    TimeZone,
    WindowPos,
    WindowSize,
}

impl_domain_keyword_conversions!(SettingKey {
    StartOfDay => "start_of_day",
    EndOfDay => "end_of_day",
    FreeSlots => "free_slots",
    LookaheadDays => "lookahead_days",
    FocusString => "focus_string",
    EachHour => "each_hour",
    TimeZone => "time_zone",
    WindowPos => "window_pos",
    WindowSize => "window_size",
});

impl SettingKey {
    pub const ALL: [Self; 9] = [
        Self::StartOfDay,
        Self::EndOfDay,
        Self::FreeSlots,
        Self::LookaheadDays,
        Self::FocusString,
        Self::EachHour,
        Self::TimeZone,
        Self::WindowPos,
        Self::WindowSize,
    ];
}

impl FocusSettings {
    /// Render one setting the way [`FocusSettings::set`] accepts it.
    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::StartOfDay => self.start_of_day.format(hhmm::FORMAT).to_string(),
            SettingKey::EndOfDay => self.end_of_day.format(hhmm::FORMAT).to_string(),
            SettingKey::FreeSlots => self.free_slots.to_string(),
            SettingKey::LookaheadDays => self.lookahead_days.to_string(),
            SettingKey::FocusString => self.focus_string.clone(),
            SettingKey::EachHour => self.each_hour.to_string(),
            SettingKey::TimeZone => self.time_zone.clone(),
            SettingKey::WindowPos => {
                self.window_pos.map(|p| format!("{},{}", p.x, p.y)).unwrap_or_default()
            }
            SettingKey::WindowSize => {
                format!("{}x{}", self.window_size.width, self.window_size.height)
            }
        }
    }

    /// Parse `value` and store it under `key`.
    ///
    /// # Errors
    /// Returns `FocusError::InvalidInput` when the value does not parse or
    /// fails validation; the settings are left untouched in that case.
    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        let value = value.trim();
        let invalid = |what: &str| FocusError::InvalidInput(format!("{key}: {what} '{value}'"));

        let mut next = self.clone();
        match key {
            SettingKey::StartOfDay => {
                next.start_of_day = hhmm::parse(value).ok_or_else(|| invalid("not a time"))?;
            }
            SettingKey::EndOfDay => {
                next.end_of_day = hhmm::parse(value).ok_or_else(|| invalid("not a time"))?;
            }
            SettingKey::FreeSlots => {
                next.free_slots = value.parse().map_err(|_| invalid("not an integer"))?;
            }
            SettingKey::LookaheadDays => {
                next.lookahead_days = value.parse().map_err(|_| invalid("not a day count"))?;
            }
            SettingKey::FocusString => next.focus_string = value.to_string(),
            SettingKey::EachHour => {
                next.each_hour = parse_bool(value).ok_or_else(|| invalid("not a boolean"))?;
            }
            SettingKey::TimeZone => next.time_zone = value.to_string(),
            SettingKey::WindowPos => {
                next.window_pos = if value.is_empty() {
                    None
                } else {
                    let (x, y) = value.split_once(',').ok_or_else(|| invalid("expected x,y"))?;
                    Some(WindowPosition {
                        x: x.trim().parse().map_err(|_| invalid("expected x,y"))?,
                        y: y.trim().parse().map_err(|_| invalid("expected x,y"))?,
                    })
                };
            }
            SettingKey::WindowSize => {
                let (w, h) = value.split_once('x').ok_or_else(|| invalid("expected WxH"))?;
                next.window_size = WindowSize {
                    width: w.trim().parse().map_err(|_| invalid("expected WxH"))?,
                    height: h.trim().parse().map_err(|_| invalid("expected WxH"))?,
                };
            }
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// # Errors
    /// Returns `FocusError::InvalidInput` for settings the engine cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.focus_string.trim().is_empty() {
            return Err(FocusError::InvalidInput("focus_string must not be empty".into()));
        }
        if self.time_zone.trim().is_empty() {
            return Err(FocusError::InvalidInput("time_zone must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Everything the reconciliation engine needs, derived from the settings in
/// one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusPolicy {
    pub window: WorkWindow,
    pub thresholds: Thresholds,
    pub focus_string: String,
    pub lookahead_days: u32,
}

impl FocusPolicy {
    pub fn from_settings(settings: &FocusSettings) -> Self {
        let window = WorkWindow::new(settings.start_of_day, settings.end_of_day);
        Self {
            thresholds: Thresholds::compute(&window, settings.free_slots),
            window,
            focus_string: settings.focus_string.clone(),
            lookahead_days: settings.lookahead_days,
        }
    }
}

impl Default for FocusPolicy {
    fn default() -> Self {
        Self::from_settings(&FocusSettings::default())
    }
}

/// `HH:MM` (de)serialization; `HH:MM:SS` is accepted on input.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{raw}'")))
    }
}
