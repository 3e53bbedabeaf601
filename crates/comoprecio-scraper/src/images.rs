//! Fallback product images for the comparison document.

use crate::client::encode_component;

/// Known product-id fragments and their official press images, checked in order.
const DEFAULT_IMAGES: &[(&str, &str)] = &[
    (
        "samsung-s24-ultra",
        "https://images.samsung.com/es/smartphones/galaxy-s24-ultra/images/galaxy-s24-ultra-highlights-color-titanium-black-mo.jpg",
    ),
    (
        "samsung-s24-plus",
        "https://images.samsung.com/es/smartphones/galaxy-s24/images/galaxy-s24-plus-highlights-color-marble-gray-mo.jpg",
    ),
    (
        "iphone-15-pro-max",
        "https://store.storeimages.cdn-apple.com/4668/as-images.apple.com/is/iphone-15-pro-max-black-titanium-select",
    ),
    (
        "iphone-15-pro",
        "https://store.storeimages.cdn-apple.com/4668/as-images.apple.com/is/iphone-15-pro-finish-select-202309-6-1inch-bluetitanium",
    ),
    (
        "sony-wh1000xm5",
        "https://www.sony.es/image/5d02da5df552836db894cead8a68f5f3",
    ),
    (
        "airpods-pro",
        "https://store.storeimages.cdn-apple.com/4668/as-images.apple.com/is/MQD83",
    ),
    (
        "ps5",
        "https://gmedia.playstation.com/is/image/SIEPDC/ps5-slim-digital-edition-front",
    ),
    (
        "nintendo-switch",
        "https://assets.nintendo.com/image/upload/ncom/en_US/switch/site-design-update/hardware-lineup-oled-white",
    ),
];

/// Returns the image for the first known fragment contained in `product_id`,
/// or a placeholder labelled with the brand.
#[must_use]
pub fn default_image(brand: &str, product_id: &str) -> String {
    DEFAULT_IMAGES
        .iter()
        .find(|(key, _)| product_id.contains(key))
        .map_or_else(
            || {
                format!(
                    "https://via.placeholder.com/400x400?text={}",
                    encode_component(brand)
                )
            },
            |(_, url)| (*url).to_owned(),
        )
}
