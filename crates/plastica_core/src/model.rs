use crate::config::AppConfig;
use crate::genome::GenomeLayout;

/// A validated configuration together with the genome layout derived from it.
///
/// Built once per run and shared read-only by every component.
#[derive(Clone, Debug)]
pub struct Model {
    pub config: AppConfig,
    pub layout: GenomeLayout,
}

impl Model {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let layout = GenomeLayout::new(&config);
        Ok(Self { config, layout })
    }

    #[must_use]
    pub fn ngenes(&self) -> usize {
        self.config.model.ngenes
    }

    #[must_use]
    pub fn nenv(&self) -> usize {
        self.config.model.nenv
    }

    #[must_use]
    pub fn ncells(&self) -> usize {
        self.config.model.ncells
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        self.config.fingerprint()
    }
}
