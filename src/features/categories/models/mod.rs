mod authority_company;
mod category;

pub use authority_company::AuthorityCompany;
pub use category::Category;
