// handlers/public/mod.rs - Public handlers (no session required)
//
// This module contains every endpoint an anonymous reader can reach, plus the
// editor login that hands out sessions.
//
// Security Level: None (completely public access)
// Visibility: published entries only
// Middleware: access mode resolution (host/path), request tracing

pub mod browse;
pub mod login;
pub mod root;
pub mod search;

pub use browse::{catalog, letter_page, letters, word_by_lemma, word_of_the_day};
pub use login::login;
pub use root::{editor_root, health, root};
pub use search::{clear_filters, search};

/*
PUBLIC HANDLER ARCHITECTURE:

Key Differences from Protected Handlers:
1. **No Session Required**: Anonymous readers, no SessionUser extension
2. **Fixed Visibility**: Always `Visibility::Public`, so drafts never leak
3. **Input Validation**: Query strings are parsed by hand (handlers::utils) and
   rejected with 400 before they reach the filter engine
4. **Cookie Persistence**: Searches save their filters in `duech_filters`

Usage Pattern:
```rust
Router::new()
    .route("/api/search", get(public::search))
    .route("/api/words/:lemma", get(public::word_by_lemma))
    .route("/editor/api/auth/login", post(public::login))
    // No session layers
```

An editor-host request for `/api/search` never reaches these handlers: the access
mode middleware rewrites it to `/editor/api/search` first.
*/
