// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Wire and domain types shared by every stage of the pipeline.

mod event;
mod subscription;

pub use event::{AlertMessage, AlertType, Change, ChangeField, ChangeKind, Event};
pub use subscription::{is_valid_email, Agenda, Subscription};
