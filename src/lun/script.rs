// ============================================================================
// src/lun/script.rs – Keystroke script for labelling a fresh LUN with format
// ============================================================================

use super::Label;

pub const PLACEHOLDER: &str = "REPLACEME";

/// Keystrokes for `format -e <lun>`: write an SMI label, set the volume
/// name, tag partition 1 as `usr`, give slice 6 everything from cylinder 34
/// onward, relabel, quit. Blank lines accept the prompt's default. Every
/// line is tied to one prompt of Solaris 11 `format`; do not reflow.
pub const FORMAT_TEMPLATE: &str = "l
0
y
vo
REPLACEME
y
p
m
1










REPLACEME
y
p
6


34

l
0
y
q
q";

pub fn build_format_script(label: &Label) -> String {
    FORMAT_TEMPLATE.replace(PLACEHOLDER, label.as_str())
}
