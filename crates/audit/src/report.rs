use std::io::{self, Write};

use crate::reconcile::Reconciliation;

/// Writes every zone and checkable with unclaimed scheduled downtimes to
/// `out`, sorted by name. Nothing is written when all are claimed.
///
/// # Errors
///
/// This function will return an error if writing to `out` fails.
pub fn render<W: Write>(reconciliation: &Reconciliation, out: &mut W) -> io::Result<()> {
    let mut zones: Vec<_> = reconciliation
        .zones()
        .iter()
        .filter(|(_, zone)| zone.missing() > 0)
        .collect();
    zones.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (zone_name, zone) in zones {
        writeln!(
            out,
            "Zone {:?} ({}/{}):\n",
            zone_name,
            zone.missing(),
            zone.total()
        )?;

        let mut checkables: Vec<(String, _)> = zone
            .checkables()
            .iter()
            .filter(|(_, checkable)| !checkable.missing().is_empty())
            .map(|(key, checkable)| (key.to_string(), checkable))
            .collect();
        checkables.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (display_name, checkable) in checkables {
            writeln!(
                out,
                "  Checkable {:?} ({}/{}):",
                display_name,
                checkable.missing().len(),
                checkable.total()
            )?;

            let mut missing: Vec<&String> = checkable.missing().iter().collect();
            missing.sort();

            for name in missing {
                writeln!(out, "    ScheduledDowntime {name:?}")?;
            }
        }
    }

    Ok(())
}

/// Renders the report into a string.
#[must_use]
pub fn render_to_string(reconciliation: &Reconciliation) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = render(reconciliation, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
