/// How tolerant a naming or resolution run is.
///
/// The committing and best-effort runs share all their logic and differ only
/// in this value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PassPolicy {
    /// Substitute `<todo>` for a missing owner or definition instead of
    /// treating it as an internal invariant violation.
    pub synthesize_stub_on_missing_owner: bool,
    /// Report diagnostics to the state's error channel.
    pub surface_diagnostics: bool,
}

impl PassPolicy {
    /// The canonical, save-triggered run.
    pub const COMMITTING: PassPolicy = PassPolicy {
        synthesize_stub_on_missing_owner: false,
        surface_diagnostics: true,
    };

    /// The query-time run over a private snapshot.
    pub const BEST_EFFORT: PassPolicy = PassPolicy {
        synthesize_stub_on_missing_owner: true,
        surface_diagnostics: false,
    };
}
