//! Catalog of supported classification networks.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Selection keyword that expands to the whole catalog.
pub const ALL_NETWORKS: &str = "all";

/// A pre-trained ImageNet classification network the profiler knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    AlexNet,
    GoogleNet,
    GoogleNet12,
    ResNet18,
    ResNet50,
    ResNet101,
    ResNet152,
    Vgg16,
    Vgg19,
    InceptionV4,
}

impl Network {
    /// Every supported network, in the fixed order used by `all`.
    pub const CATALOG: [Network; 10] = [
        Network::AlexNet,
        Network::GoogleNet,
        Network::GoogleNet12,
        Network::ResNet18,
        Network::ResNet50,
        Network::ResNet101,
        Network::ResNet152,
        Network::Vgg16,
        Network::Vgg19,
        Network::InceptionV4,
    ];

    /// Identifier used on the command line and in output file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Network::AlexNet => "alexnet",
            Network::GoogleNet => "googlenet",
            Network::GoogleNet12 => "googlenet-12",
            Network::ResNet18 => "resnet-18",
            Network::ResNet50 => "resnet-50",
            Network::ResNet101 => "resnet-101",
            Network::ResNet152 => "resnet-152",
            Network::Vgg16 => "vgg-16",
            Network::Vgg19 => "vgg-19",
            Network::InceptionV4 => "inception-v4",
        }
    }

    /// Square input resolution expected by the network.
    pub fn input_resolution(self) -> u32 {
        match self {
            Network::InceptionV4 => 299,
            _ => 224,
        }
    }

    /// File name of the ONNX graph inside the model directory.
    pub fn model_file_name(self) -> String {
        format!("{}.onnx", self.as_str())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a network identifier is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported network '{0}' (expected `all` or one of: {catalog})", catalog = catalog_listing())]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Network::CATALOG
            .into_iter()
            .find(|network| network.as_str() == wanted)
            .ok_or_else(|| UnknownNetwork(s.to_string()))
    }
}

/// Expand a `--network` selection into the ordered list of networks to run.
///
/// `all` yields the full catalog; any other value must name a single network.
pub fn resolve_networks(selection: &str) -> Result<Vec<Network>, UnknownNetwork> {
    if selection.trim().eq_ignore_ascii_case(ALL_NETWORKS) {
        return Ok(Network::CATALOG.to_vec());
    }
    Ok(vec![selection.parse()?])
}

/// Comma-separated catalog identifiers, for help and error text.
pub fn catalog_listing() -> String {
    Network::CATALOG
        .iter()
        .map(|network| network.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
