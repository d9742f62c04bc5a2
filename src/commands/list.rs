//! List command implementation

use crate::targets;

/// Print the debug targets built into this binary
pub fn list_targets() {
    let available = targets::available_targets();

    if available.is_empty() {
        println!("No debug targets enabled in this build");
        return;
    }

    println!("Available debug targets:");
    println!();
    for target in available {
        println!("  {:<12} {}", target.name, target.description);
    }
}
