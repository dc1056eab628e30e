// Route handlers, one module per resource family.
//
// Reads (GET) are public storefront endpoints. Writes follow the same order
// everywhere: path + body validation (400), session (401), store ownership
// (403), then the catalog call.
pub mod billboards;
pub mod categories;
pub mod colors;
pub mod products;
pub mod sizes;
pub mod stores;
pub mod utils;
