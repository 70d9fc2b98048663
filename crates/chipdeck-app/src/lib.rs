// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod focus;
pub mod ids;
pub mod layout;
pub mod load;
pub mod model;
pub mod nav;
pub mod state;
pub mod viewport;

pub use focus::*;
pub use ids::*;
pub use layout::*;
pub use load::*;
pub use model::*;
pub use nav::*;
pub use state::*;
pub use viewport::*;
