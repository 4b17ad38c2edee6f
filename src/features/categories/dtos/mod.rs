mod category_dto;

pub use category_dto::{AuthorityCompanyQuery, AuthorityCompanyResponseDto, CategoryResponseDto};
