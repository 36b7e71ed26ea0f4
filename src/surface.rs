//! Drawing backend seam. The compositor decides where things go; a
//! surface fetches the pixels and puts them on screen.

use async_trait::async_trait;

use crate::compositor::Compositor;
use crate::error::Result;
use crate::types::PreviewFormat;

#[async_trait(?Send)]
pub trait Surface {
    type Image: Clone;

    async fn load_image(&self, url: &str) -> Result<Self::Image>;

    /// Natural width and height.
    fn image_size(&self, image: &Self::Image) -> (f64, f64);

    /// Redraw the whole scene, selection frame included.
    fn render(&self, scene: &Compositor<Self::Image>);

    /// Encode the scene without selection decorations as a data URL.
    fn snapshot(&self, scene: &Compositor<Self::Image>, format: PreviewFormat, quality: f64) -> Result<String>;
}
