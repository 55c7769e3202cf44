#[cfg(feature = "pdf")]
pub mod pdf;
#[cfg(feature = "png")]
pub mod png;

#[cfg(any(feature = "png", feature = "pdf"))]
mod fonts {
    use std::sync::{Arc, OnceLock};

    use usvg::fontdb::Database;

    static SYSTEM_FONTS: OnceLock<Arc<Database>> = OnceLock::new();

    /// Parsing options with the system fonts, loaded once per process.
    pub(crate) fn svg_options() -> usvg::Options<'static> {
        let fontdb = SYSTEM_FONTS.get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        });
        usvg::Options { fontdb: Arc::clone(fontdb), ..Default::default() }
    }
}

#[cfg(any(feature = "png", feature = "pdf"))]
pub(crate) use fonts::svg_options;
