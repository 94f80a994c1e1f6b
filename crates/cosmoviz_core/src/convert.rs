//! Array store to JSON view conversion
//!
//! A conversion moves through `Unloaded -> Loaded -> Parsed` and ends by
//! producing a [`DatasetView`]. Each transition consumes the previous stage,
//! so a view can only be built from a container that was read and validated.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{Dataset, SweepLayout};
use crate::store::RawContainer;
use crate::view::{DatasetView, write_view};

/// A container path and the layout it is expected to hold.
#[derive(Debug, Clone)]
pub struct Unloaded {
    path: PathBuf,
    layout: SweepLayout,
}

/// Every container member is in memory; nothing has been checked yet.
#[derive(Debug, Clone)]
pub struct Loaded {
    raw: RawContainer,
    layout: SweepLayout,
}

/// A dataset whose arrays agree with its axes.
#[derive(Debug, Clone)]
pub struct Parsed {
    dataset: Dataset,
}

#[derive(Debug, Clone)]
pub struct StoreConversion<S> {
    state: S,
}

impl StoreConversion<Unloaded> {
    pub fn new(path: impl Into<PathBuf>, layout: SweepLayout) -> Self {
        Self {
            state: Unloaded {
                path: path.into(),
                layout,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn load(self) -> Result<StoreConversion<Loaded>> {
        let Unloaded { path, layout } = self.state;
        let raw = RawContainer::load(&path)?;
        Ok(StoreConversion {
            state: Loaded { raw, layout },
        })
    }
}

impl StoreConversion<Loaded> {
    pub fn container(&self) -> &RawContainer {
        &self.state.raw
    }

    pub fn parse(self) -> Result<StoreConversion<Parsed>> {
        let Loaded { raw, layout } = self.state;
        let path = raw.path().to_path_buf();
        let dataset = raw.into_dataset(layout)?;
        tracing::debug!(
            path = %path.display(),
            layout = ?layout,
            xi_shape = ?dataset.xi.shape(),
            "Container parsed"
        );
        Ok(StoreConversion {
            state: Parsed { dataset },
        })
    }
}

impl StoreConversion<Parsed> {
    pub fn dataset(&self) -> &Dataset {
        &self.state.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.state.dataset
    }

    pub fn convert(self) -> DatasetView {
        DatasetView::from_dataset(&self.state.dataset)
    }
}

/// Read the container at `input` and write its JSON view to `output`.
///
/// The output file is only created once the whole view has been built.
pub fn convert_store(input: &Path, layout: SweepLayout, output: &Path) -> Result<DatasetView> {
    let view = StoreConversion::new(input, layout)
        .load()?
        .parse()?
        .convert();
    write_view(output, &view)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        data_type = %view.metadata.data_type,
        "Conversion complete"
    );
    Ok(view)
}
