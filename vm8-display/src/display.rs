use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use vm8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vm8_core::FrameBuffer;

const SCALE: usize = 10;

/// # Display
/// Renders the machine's 64x32 monochrome framebuffer in an SDL2 window.
///
/// The engine imposes no color semantics; this maps on/off to white/black.
/// It only gets a `render` call when the framebuffer actually changed.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    /// Opens a scaled window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "vm8",
                (DISPLAY_WIDTH * SCALE) as u32,
                (DISPLAY_HEIGHT * SCALE) as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        Ok(Display { canvas })
    }

    /// Flattens a framebuffer into an RGB24 texture buffer: rows are
    /// concatenated, every cell becomes three equal channel bytes, and the
    /// 0/1 cell values are stretched to 0/255 intensity.
    ///
    /// # Arguments
    /// * `frame` the machine's framebuffer
    fn frame_to_rgb24(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|cell| std::iter::repeat(cell).take(3))
            .map(|cell| cell * 255)
            .collect()
    }

    /// Uploads the framebuffer as a streaming texture and presents it.
    ///
    /// # Arguments
    /// * `frame` the machine's framebuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        texture.with_lock(None, |buffer: &mut [u8], _pitch: usize| {
            buffer.copy_from_slice(&Display::frame_to_rgb24(frame));
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}
