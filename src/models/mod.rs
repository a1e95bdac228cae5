pub mod asset;

pub use asset::{add_months_clamped, Asset, AssetDraft, NewAsset};
