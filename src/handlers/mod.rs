// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no session) → Protected (editor session) → Elevated (admin session)
//
// Declare the three security tiers
pub mod public;    // Tier 1: No session required (/api/*, /editor/api/auth/login)
pub mod protected; // Tier 2: Editor session required (/editor/api/*)
pub mod elevated;  // Tier 3: Admin session required (/editor/api/users*)

// Query parsing and filter cookie plumbing shared by both access modes
pub mod utils;

/*
ROUTE LAYOUT:

src/handlers/
├── public/
│   ├── root.rs     ← GET /, GET /editor, GET /health
│   ├── search.rs   ← GET /api/search, DELETE /api/search/filters
│   ├── browse.rs   ← words by lemma, letters, word of the day, catalog
│   └── login.rs    ← POST /editor/api/auth/login
├── protected/
│   ├── session.rs  ← whoami, logout
│   ├── search.rs   ← editor search, letters, word of the day
│   ├── words.rs    ← create, edit, status workflow, assignment
│   └── notes.rs    ← reviewer notes
└── elevated/
    └── users.rs    ← account administration

Public and editor handlers share the same services; what differs is the
`Visibility` they pass down and the filter cookie they read and write.
*/
