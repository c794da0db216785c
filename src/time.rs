use hifitime::{Epoch, TimeScale};

/// Seconds elapsed into the current GPS week.
pub(crate) fn gps_week_second(t: Epoch) -> f64 {
    let t = match t.time_scale {
        TimeScale::GPST => t,
        _ => t.to_time_scale(TimeScale::GPST),
    };
    let (_week, nanos) = t.to_time_of_week();
    nanos as f64 * 1.0E-9
}
