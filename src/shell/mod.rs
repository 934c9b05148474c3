// Purpose - the player a host mounts, plus preview groups and share/gift data

pub mod player;
pub mod preview;
pub mod props;
pub mod share;

pub use player::{PlayOutcome, PlayerHooks, PlayerResources, PlayerShell};
pub use preview::PreviewGroup;
pub use props::PlayerProps;
pub use share::{GiftPayload, SharePayload};
