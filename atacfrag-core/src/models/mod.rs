pub mod feature_set;
pub mod fragment;
pub mod region;

// re-export for cleaner imports
pub use self::feature_set::FeatureSet;
pub use self::fragment::Fragment;
pub use self::region::Region;
