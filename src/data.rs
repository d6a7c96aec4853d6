pub mod forecast;
pub mod geoip;
pub mod resolver;
