pub mod member;
pub mod product;
pub mod purchase;

pub use member::{Member, MemberResponse, MemberWithProducts, PurchasedProduct};
pub use product::Product;
pub use purchase::{NewPurchase, PurchaseResponse};
