// ============================================================================
// src/lun/ticket.rs – Absolute device paths for the change ticket
// ============================================================================

use std::io::{self, Write};

use super::{Lun, LunId, DATA_SLICE};

/// `<device_root>/<id>s6`. A missing trailing slash on the root is added.
pub fn ticket_path(device_root: &str, id: &LunId) -> String {
    let sep = if device_root.is_empty() || device_root.ends_with('/') {
        ""
    } else {
        "/"
    };
    format!("{device_root}{sep}{id}{DATA_SLICE}")
}

/// One path per line, nothing else, so the output can be pasted as is.
pub fn write_tickets<W: Write + ?Sized>(out: &mut W, luns: &[Lun]) -> io::Result<()> {
    for path in luns.iter().filter_map(Lun::ticket_path) {
        writeln!(out, "{path}")?;
    }
    out.flush()
}
