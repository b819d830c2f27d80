// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io::{IsTerminal, Write, stderr};

use tracing::info;

/// Overwrites the current terminal line with the status message
pub(crate) fn interactive(status: &str) {
    let mut stderr = stderr();
    let _ = write!(stderr, "\r{status: <50}\r");
    let _ = stderr.flush();
}

/// Logs the status message at info level
pub(crate) fn headless(status: &str) {
    info!(status);
}

/// Picks the status printer matching the output
pub(crate) fn printer() -> fn(&str) {
    if stderr().is_terminal() {
        interactive
    } else {
        headless
    }
}
