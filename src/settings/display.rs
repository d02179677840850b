//! UI and localization settings

use serde::Serialize;

use crate::env::{EnvReader, EnvSource};
use crate::error::ConfigResult;

/// Banners, page sizes and rack drawing dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DisplaySettings {
    /// HTML allowed in all three banners
    pub banner_top: String,
    pub banner_bottom: String,
    pub banner_login: String,
    pub paginate_count: u32,
    /// Upper bound for `?limit=`; 0 allows unlimited
    pub max_page_size: u32,
    pub rack_elevation_default_unit_height: u32,
    pub rack_elevation_default_unit_width: u32,
}

impl DisplaySettings {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        Ok(Self {
            banner_top: env.string("NAUTOBOT_BANNER_TOP", ""),
            banner_bottom: env.string("NAUTOBOT_BANNER_BOTTOM", ""),
            banner_login: env.string("NAUTOBOT_BANNER_LOGIN", ""),
            paginate_count: env.parse("NAUTOBOT_PAGINATE_COUNT", 50)?,
            max_page_size: env.parse("NAUTOBOT_MAX_PAGE_SIZE", 1000)?,
            rack_elevation_default_unit_height: env
                .parse("NAUTOBOT_RACK_ELEVATION_DEFAULT_UNIT_HEIGHT", 22)?,
            rack_elevation_default_unit_width: env
                .parse("NAUTOBOT_RACK_ELEVATION_DEFAULT_UNIT_WIDTH", 220)?,
        })
    }
}

/// Time zone and date/time rendering formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Localization {
    pub time_zone: String,
    pub date_format: String,
    pub short_date_format: String,
    pub time_format: String,
    pub short_time_format: String,
    pub datetime_format: String,
    pub short_datetime_format: String,
}

impl Localization {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> Self {
        Self {
            time_zone: env.string("NAUTOBOT_TIME_ZONE", "UTC"),
            date_format: env.string("NAUTOBOT_DATE_FORMAT", "N j, Y"),
            short_date_format: env.string("NAUTOBOT_SHORT_DATE_FORMAT", "Y-m-d"),
            time_format: env.string("NAUTOBOT_TIME_FORMAT", "g:i a"),
            short_time_format: env.string("NAUTOBOT_SHORT_TIME_FORMAT", "H:i:s"),
            datetime_format: env.string("NAUTOBOT_DATETIME_FORMAT", "N j, Y g:i a"),
            short_datetime_format: env.string("NAUTOBOT_SHORT_DATETIME_FORMAT", "Y-m-d H:i"),
        }
    }
}
