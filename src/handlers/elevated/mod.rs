// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// This module contains account administration: listing staff, creating
// accounts and changing roles, passwords or the active flag.
//
// Security Level: Session + user management permission
// Route Prefix: /editor/api/users*
// Middleware: session token validation + user validation + require_user_manager

pub mod users;

pub use users::{create as users_create, list as users_list, update as users_update};

/*
ELEVATED HANDLER ARCHITECTURE:

Middleware Stack Applied to All Elevated Routes:
```rust
let admin = Router::new()
    .route("/api/users", get(elevated::users_list).post(elevated::users_create))
    .route("/api/users/:id", put(elevated::users_update))
    .route_layer(from_fn(require_user_manager)); // Role gate

// merged into the session-required router, which adds the session layers
```

Role Hierarchy:
- **admin**: manages lexicographers and editors
- **superadmin**: manages everyone, including other admins

Guard Rails (enforced in services::user_service):
- nobody deactivates their own account
- nobody changes their own role
- a manager never grants a role at or above their own, unless superadmin

With audit logging enabled every account change is written to the `audit`
tracing target.
*/
