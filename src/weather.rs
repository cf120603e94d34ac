use crate::component::NEUTRAL_SCORE;
use crate::types::{Precipitation, Venue, WeatherContext};

/// Points of score shaved off per unit of accumulated weather impact.
const IMPACT_SCALE: f64 = 2.0;

/// Integer severity of the conditions: cold, wind and precipitation each
/// contribute a small bump. Domes are always zero.
pub fn weather_impact(ctx: &WeatherContext) -> u32 {
    if ctx.venue == Venue::Dome {
        return 0;
    }
    let mut impact = 0u32;
    if let Some(temp) = ctx.temperature_f {
        if temp < 32.0 {
            impact += 3;
        } else if temp < 45.0 {
            impact += 2;
        } else if temp > 85.0 {
            impact += 1;
        }
    }
    if let Some(wind) = ctx.wind_mph {
        if wind > 15.0 {
            impact += 3;
        } else if wind > 10.0 {
            impact += 2;
        } else if wind > 5.0 {
            impact += 1;
        }
    }
    impact += match ctx.precipitation {
        Precipitation::None => 0,
        Precipitation::Rain => 2,
        Precipitation::Snow => 3,
    };
    impact
}

/// Weather contribution on the 0..100 scale. Unknown conditions and domes
/// both sit at the neutral 50.
pub fn weather_score(ctx: Option<&WeatherContext>) -> f64 {
    let Some(ctx) = ctx else {
        return NEUTRAL_SCORE;
    };
    let impact = f64::from(weather_impact(ctx));
    (NEUTRAL_SCORE - IMPACT_SCALE * impact).clamp(0.0, 100.0)
}
