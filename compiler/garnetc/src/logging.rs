use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Later calls do nothing.
///
/// The filter comes from `GARNET_LOG`, then `RUST_LOG`, and defaults to
/// `warn`. With `tree`, spans are printed as an indented hierarchy, which is
/// the easiest way to read a pipeline run.
pub fn init_tracing(tree: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("GARNET_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_owned());
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));

        let tree_layer = tree.then(|| {
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_indent_lines(true)
        });
        let fmt_layer = (!tree).then(|| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
        });

        // Another subscriber may already be installed (tests, embedding).
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tree_layer)
            .with(fmt_layer)
            .try_init();
    });
}
