//! WMO weather code interpretation: label, icon and background theme.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Icon reference for a condition. The renderer maps these to glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionIcon {
    Sun,
    CloudSun,
    Cloud,
    CloudFog,
    CloudDrizzle,
    CloudRain,
    CloudSnow,
    CloudLightning,
    Wind,
}

impl ConditionIcon {
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::CloudSun => "cloud_sun",
            Self::Cloud => "cloud",
            Self::CloudFog => "cloud_fog",
            Self::CloudDrizzle => "cloud_drizzle",
            Self::CloudRain => "cloud_rain",
            Self::CloudSnow => "cloud_snow",
            Self::CloudLightning => "cloud_lightning",
            Self::Wind => "wind",
        }
    }
}

/// Two-stop background gradient, as palette tokens (e.g. "blue-400").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundTheme {
    pub from: &'static str,
    pub to: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionDescriptor {
    pub label: &'static str,
    pub icon: ConditionIcon,
    pub theme: BackgroundTheme,
}

/// Used for codes missing from the table.
pub const DEFAULT_DESCRIPTOR: ConditionDescriptor =
    descriptor("Clima", ConditionIcon::Wind, "slate-700", "slate-900");

const fn descriptor(
    label: &'static str,
    icon: ConditionIcon,
    from: &'static str,
    to: &'static str,
) -> ConditionDescriptor {
    ConditionDescriptor {
        label,
        icon,
        theme: BackgroundTheme { from, to },
    }
}

/// Look up a condition code, falling back to [`DEFAULT_DESCRIPTOR`].
pub fn describe(code: i32) -> ConditionDescriptor {
    use ConditionIcon::*;

    match code {
        0 => descriptor("Céu limpo", Sun, "blue-400", "blue-600"),
        1 => descriptor("Predom. limpo", CloudSun, "blue-500", "indigo-600"),
        2 => descriptor("Parcialmente nublado", CloudSun, "blue-500", "slate-700"),
        3 => descriptor("Nublado", Cloud, "slate-600", "slate-800"),
        45 => descriptor("Nevoeiro", CloudFog, "slate-700", "slate-900"),
        48 => descriptor("Nevoeiro geada", CloudFog, "slate-700", "slate-900"),
        51 => descriptor("Drizzle leve", CloudDrizzle, "indigo-600", "indigo-800"),
        53 => descriptor("Drizzle moderada", CloudDrizzle, "indigo-600", "indigo-800"),
        55 => descriptor("Drizzle densa", CloudDrizzle, "indigo-700", "indigo-900"),
        61 => descriptor("Chuva leve", CloudRain, "blue-700", "blue-900"),
        63 => descriptor("Chuva moderada", CloudRain, "blue-800", "blue-950"),
        65 => descriptor("Chuva forte", CloudRain, "blue-900", "black"),
        71 => descriptor("Neve leve", CloudSnow, "slate-400", "slate-600"),
        73 => descriptor("Neve moderada", CloudSnow, "slate-500", "slate-700"),
        75 => descriptor("Neve forte", CloudSnow, "slate-600", "slate-800"),
        80 => descriptor("Aguaceiros leves", CloudRain, "blue-600", "blue-800"),
        81 => descriptor("Aguaceiros mod.", CloudRain, "blue-700", "blue-900"),
        82 => descriptor("Aguaceiros fortes", CloudRain, "blue-800", "black"),
        95 => descriptor("Trovoada", CloudLightning, "purple-800", "black"),
        96 => descriptor("Trovoada c/ granizo", CloudLightning, "purple-900", "black"),
        99 => descriptor("Trovoada forte", CloudLightning, "purple-950", "black"),
        _ => DEFAULT_DESCRIPTOR,
    }
}

/// Same as [`describe`], treating a missing code as unmapped.
pub fn describe_opt(code: Option<i32>) -> ConditionDescriptor {
    code.map(describe).unwrap_or(DEFAULT_DESCRIPTOR)
}
