use prometheus::{register_int_counter_with_registry, IntCounter, Registry};

#[derive(Clone)]
pub struct PersistenceMetrics {
    pub saves: IntCounter,
    pub failed_saves: IntCounter,
    pub loaded_rows: IntCounter,
    pub abandoned_rows: IntCounter,
}

impl PersistenceMetrics {
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let saves = register_int_counter_with_registry!(
            "house_saves",
            "completed house save passes",
            registry
        )?;

        let failed_saves = register_int_counter_with_registry!(
            "house_failed_saves",
            "house save passes rolled back",
            registry
        )?;

        let loaded_rows = register_int_counter_with_registry!(
            "house_loaded_rows",
            "house tile rows restored",
            registry
        )?;

        let abandoned_rows = register_int_counter_with_registry!(
            "house_abandoned_rows",
            "house tile rows abandoned on load",
            registry
        )?;

        Ok(Self {
            saves,
            failed_saves,
            loaded_rows,
            abandoned_rows,
        })
    }
}
