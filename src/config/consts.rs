/// Key a step (or step item) uses to inherit from another node in the root config
pub const REF_KEY: &str = "ref";
/// Keys never inherited through a `ref`; the referencing node must set them itself
pub const NON_INHERITED_KEYS: [&str; 5] = [
    "callbacks",
    "lazy_built",
    "max_train_steps",
    "with_train",
    "with_valid",
];
/// Root key holding the ordered step names
pub const PIPELINE_KEY: &str = "pipeline";
/// Root key holding run-wide settings
pub const GENERAL_KEY: &str = "general";
/// Epochs per step when a step does not set `epochs`
pub const DEFAULT_EPOCHS: usize = 1;
/// Steps per epoch when a step does not set `steps_per_epoch`
pub const DEFAULT_STEPS_PER_EPOCH: usize = 1;
