//! Plain-text summary of worker replies, for terminals and logs

use std::fmt::Write;

use photometrics::heatmap::peak;
use photometrics::spectrum::peak_wavelength;

use crate::protocol::Reply;

/// One block per reply; formatted values use the display precision of
/// [`PowerMetrics`](photometrics::PowerMetrics)
pub fn render_summary(replies: &[Reply]) -> String {
    let mut out = String::new();
    for reply in replies {
        // writing into a String cannot fail
        let _ = write_reply(&mut out, reply);
    }
    out
}

fn write_reply(out: &mut String, reply: &Reply) -> std::fmt::Result {
    match reply {
        Reply::Heatmap { data } => {
            write!(out, "heatmap   {} points", data.len())?;
            if let Some(p) = peak(data) {
                write!(out, ", peak {:.1} μmol/m²/s at ({}, {})", p.value, p.x, p.y)?;
            }
            writeln!(out)
        }
        Reply::Metrics { data } => {
            writeln!(out, "metrics   computed in {:.1} ms", data.calculation_time)?;
            for line in data.metrics.to_string().lines() {
                writeln!(out, "          {}", line)?;
            }
            Ok(())
        }
        Reply::Spectrum { data } => match peak_wavelength(data) {
            Some(nm) => writeln!(out, "spectrum  {} buckets, peak {} nm", data.len(), nm),
            None => writeln!(out, "spectrum  {} buckets, no spectral data", data.len()),
        },
        Reply::Optimized { data } => {
            writeln!(out, "layout    {} fixtures", data.len())?;
            for p in data {
                writeln!(out, "          ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z)?;
            }
            Ok(())
        }
        Reply::Error { error, code } => writeln!(out, "error     [{:?}] {}", code, error),
    }
}
