//! Dashboard definition loading.

use core::convert::Infallible;

use log::debug;

use crate::dashboard::model::Dashboard;

/// Loading cannot fail while definitions are ignored.
pub type LoadError = Infallible;

/// Apply a textual dashboard definition to `dashboard`.
///
/// No definition format is understood yet: the text is ignored and the
/// dashboard is left as it was.
pub fn load_dashboard(dashboard: &mut Dashboard, definition: &str) -> Result<(), LoadError> {
    debug!(
        "ignoring {}-byte definition for dashboard '{}'",
        definition.len(),
        dashboard.name()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::demo::demo_dashboard;

    #[test]
    fn definition_leaves_dashboard_untouched() {
        let mut dash = demo_dashboard();
        let before: Vec<_> = dash.elements().cloned().collect();

        assert_eq!(load_dashboard(&mut dash, "{ \"gauges\": [] }"), Ok(()));
        let after: Vec<_> = dash.elements().cloned().collect();
        assert_eq!(before, after);
    }
}
