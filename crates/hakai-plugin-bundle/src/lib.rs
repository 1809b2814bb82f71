//! Plugin bundle
//!
//! This crate serves as the single collection point for all concrete
//! plugin crates in the Hakai system. It depends on every plugin
//! implementation so that linking the bundle links them all, while the
//! runtime layers stay decoupled from specific plugins.

use hakai_plugin_api::{iter_plugins, PluginDescriptor};

// Force linker to include plugin crates by actively using them.
// This prevents linker dead code elimination from stripping the
// inventory submissions.
#[cfg(feature = "audio")]
use hakai_audio::SoundCuePlugin;
#[cfg(feature = "effects")]
use hakai_effects::{PaddleExpandPlugin, PaddleSlowPlugin, SpawnBallPlugin};

// This function is never called but ensures the linker includes all
// plugin crates; the descriptors themselves are discovered via inventory.
#[allow(dead_code)]
fn _force_plugin_linkage() {
    #[cfg(feature = "effects")]
    let _: Option<PaddleExpandPlugin> = None;
    #[cfg(feature = "effects")]
    let _: Option<PaddleSlowPlugin> = None;
    #[cfg(feature = "effects")]
    let _: Option<SpawnBallPlugin> = None;
    #[cfg(feature = "audio")]
    let _: Option<SoundCuePlugin> = None;
}

/// Contract names covered by the bundled plugins.
pub fn bundled_contracts() -> Vec<&'static str> {
    let mut contracts = Vec::new();
    #[cfg(feature = "effects")]
    contracts.push(hakai_effects::EFFECTS_CONTRACT);
    #[cfg(feature = "audio")]
    contracts.push("audio");
    contracts
}

/// Returns every plugin descriptor linked into this binary.
///
/// Plugins self-register through the `hakai_plugin!` macro; this just
/// walks the inventory collection and logs what it finds.
pub fn all_descriptors() -> Vec<&'static PluginDescriptor> {
    let descriptors: Vec<_> = iter_plugins()
        .inspect(|descriptor| {
            tracing::debug!(
                contract = descriptor.contract,
                type_name = descriptor.type_name,
                "Discovered plugin via inventory"
            );
        })
        .collect();

    tracing::info!(
        plugin_count = descriptors.len(),
        "Plugin bundle discovery complete"
    );

    if descriptors.is_empty() {
        tracing::warn!("No plugins discovered - inventory system may be broken");
    }

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bundle_links_the_expected_plugins() {
        let descriptors = all_descriptors();
        let keys: HashSet<_> = descriptors.iter().map(|d| d.key()).collect();

        assert!(keys.contains(&("effects", "paddle_expand")));
        assert!(keys.contains(&("effects", "paddle_slow")));
        assert!(keys.contains(&("effects", "spawn_ball")));
        assert!(keys.contains(&("audio", "sound_cues")));
    }

    #[test]
    fn descriptor_keys_are_unique() {
        let descriptors = all_descriptors();
        let mut keys = HashSet::new();
        for descriptor in descriptors {
            assert!(
                keys.insert(descriptor.key()),
                "Duplicate plugin key found: {:?}",
                descriptor.key()
            );
        }
    }

    #[test]
    fn factories_produce_matching_instances() {
        for descriptor in all_descriptors() {
            let instance = (descriptor.factory)();
            assert_eq!(instance.contract(), descriptor.contract);
            assert_eq!(instance.type_name(), descriptor.type_name);
        }
    }
}
