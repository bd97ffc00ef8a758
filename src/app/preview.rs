use crate::thumbnails::Preview;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use image::RgbaImage;

fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// GPU copy of whatever the preview area currently shows.
#[derive(Default)]
pub struct PreviewTexture {
    texture: Option<TextureHandle>,
    placeholder: Option<TextureHandle>,
}

impl PreviewTexture {
    pub fn set(&mut self, ctx: &egui::Context, preview: Preview, placeholder: &RgbaImage) {
        self.texture = match preview {
            Preview::Blank => None,
            Preview::Placeholder => Some(
                self.placeholder
                    .get_or_insert_with(|| {
                        ctx.load_texture("placeholder", to_color_image(placeholder), TextureOptions::LINEAR)
                    })
                    .clone(),
            ),
            Preview::Map { stem, image } => Some(ctx.load_texture(
                format!("map:{}", stem),
                to_color_image(&image),
                TextureOptions::LINEAR,
            )),
        };
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }
}
