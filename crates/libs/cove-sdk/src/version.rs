//! Lenient dotted-version comparison.
//!
//! Versions are compared component by component as integers. Non-numeric
//! components are skipped rather than rejected, so "2.1-beta" compares as
//! just "2". If the installed version runs out of components while required
//! components remain, it is treated as older.

/// Returns true when `installed` satisfies `required` (installed >= required).
pub fn is_version_compatible(installed: &str, required: &str) -> bool {
    let installed = components(installed);
    let required = components(required);

    for (index, required_part) in required.iter().enumerate() {
        let Some(installed_part) = installed.get(index) else {
            return false;
        };
        if installed_part > required_part {
            return true;
        }
        if installed_part < required_part {
            return false;
        }
    }
    true
}

fn components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}
