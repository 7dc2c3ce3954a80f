use egui::ColorImage;
use image::RgbImage;

/// Convertit une RgbImage (rendu CPU) en ColorImage egui pour affichage.
pub fn rgb_image_to_color_image(img: &RgbImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    ColorImage::from_rgb(size, img.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_size_and_opaque_pixels() {
        let img = RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255]).expect("buffer 2x1");
        let color = rgb_image_to_color_image(&img);
        assert_eq!(color.size, [2, 1]);
        assert_eq!(color.pixels[0], egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(color.pixels[1], egui::Color32::from_rgb(0, 0, 255));
    }
}
