pub mod geocode_use_case;
pub mod ports;
pub mod survey_use_case;
