use export_resolver_core::contract::ExportRecord;

/// Lists the exports currently published in a region.
///
/// Implementations read a single page; pagination is not followed.
pub trait ExportLister {
    fn list_exports(&self, region: &str) -> Result<Vec<ExportRecord>, String>;
}
