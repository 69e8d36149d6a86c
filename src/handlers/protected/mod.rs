// handlers/protected/mod.rs - Protected handlers (editor session required)
//
// This module contains the editor-mode endpoints lexicographers use to curate
// the corpus: searching every status, editing entries, moving them through the
// review workflow, assigning reviewers and leaving notes.
//
// Security Level: Session Required
// Route Prefix: /editor/api/* (or /api/* on the editor host, rewritten)
// Middleware: session token validation + user validation against the store

pub mod notes;
pub mod search;
pub mod session;
pub mod words;

pub use notes::{create as notes_create, delete as notes_delete, list as notes_list};
pub use search::{clear_filters, letter_page, letters, search, word_of_the_day};
pub use session::{logout, whoami};
pub use words::{
    assignee as word_assignee, create as word_create, delete as word_delete, get as word_get,
    status as word_status, update as word_update,
};

/*
PROTECTED HANDLER ARCHITECTURE:

Middleware Stack Applied to All Protected Routes:
```rust
Router::new()
    .route("/api/words/:id", get(protected::word_get))
    .route_layer(from_fn_with_state(state.clone(), validate_user_middleware)) // Store check
    .route_layer(from_fn_with_state(state, session_auth_middleware))          // Token check
```

Handler Context:
Each protected handler may extract:
- **SessionUser**: id, username and role, re-checked against the store on every request
- **AppState**: configuration, store and session keys

Permission checks live in the services, not here:
- lexicographers edit words they created or were assigned
- editors edit anything, review, publish and assign
- admins also delete words and manage accounts (see handlers::elevated)

Status: 401 for a missing, invalid or expired session; 403 for an inactive
account, a stale role or a missing permission.
*/
