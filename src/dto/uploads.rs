use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

/// Storage folders images may be uploaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Products,
    Banners,
    Categories,
    Stores,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::Products => "products",
            ImageFolder::Banners => "banners",
            ImageFolder::Categories => "categories",
            ImageFolder::Stores => "stores",
        }
    }
}

impl FromStr for ImageFolder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(ImageFolder::Products),
            "banners" => Ok(ImageFolder::Banners),
            "categories" => Ok(ImageFolder::Categories),
            "stores" => Ok(ImageFolder::Stores),
            _ => Err(AppError::BadRequest("Unknown upload folder".into())),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    pub url: String,
    pub path: String,
    pub size: usize,
    pub content_type: String,
}
