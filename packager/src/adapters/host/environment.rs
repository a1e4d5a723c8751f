//! Host environment detection and file delivery

use std::env;
use std::path::Path;

use crate::domain::ports::{DeliveryReceipt, FileDelivery};

/// Where the packager is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnvironment {
    /// Google Colab style notebook; the browser downloads files
    InteractiveNotebook,
    /// Kaggle kernel; files are fetched from the output pane
    HostedKernel,
    Plain,
}

impl HostEnvironment {
    /// Detect the host from the process environment
    pub fn detect() -> Self {
        Self::detect_from(|key| env::var_os(key).is_some())
    }

    /// Detect the host from an arbitrary "is this variable set" probe
    pub fn detect_from<F>(is_set: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        if is_set("COLAB_GPU") || is_set("COLAB_RELEASE_TAG") {
            HostEnvironment::InteractiveNotebook
        } else if is_set("KAGGLE_KERNEL_RUN_TYPE") || is_set("KAGGLE_URL_BASE") {
            HostEnvironment::HostedKernel
        } else {
            HostEnvironment::Plain
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostEnvironment::InteractiveNotebook => "colab",
            HostEnvironment::HostedKernel => "kaggle",
            HostEnvironment::Plain => "local",
        }
    }
}

impl FileDelivery for HostEnvironment {
    fn deliver(&self, path: &Path) -> DeliveryReceipt {
        let shown = path.display().to_string();
        let instructions = match self {
            HostEnvironment::InteractiveNotebook => vec![
                "Run this in a notebook cell to download the file:".to_string(),
                format!("from google.colab import files; files.download({:?})", shown),
            ],
            HostEnvironment::HostedKernel => vec![
                format!("Your file `{}` has been generated.", shown),
                "Open it from the notebook output pane (or display a FileLink to it).".to_string(),
                "Save it to your computer with its original extension.".to_string(),
                "You MUST submit this file to Autolab.".to_string(),
            ],
            HostEnvironment::Plain => Vec::new(),
        };

        tracing::info!(host = self.name(), path = %shown, "File ready");
        DeliveryReceipt {
            host: self.name(),
            path: path.to_path_buf(),
            instructions,
        }
    }
}
