use crate::adapter::font::Font;
use crate::adapter::platform::DisplayMetrics;
use crate::color::{ColourDesired, HostColor};
use crate::context;
use crate::engine::Surface;
use crate::geometry::{HostRect, PRectangle, Point};

/// Fill used when the engine asks for a pattern fill.
const PATTERN_FILL: ColourDesired = ColourDesired(0xD000_0000);

/// [`Surface`] implementation that forwards to the host bound on the
/// current thread.
///
/// Engine rectangles are window-local; the render pass sets the window's
/// absolute origin once and every rectangle is shifted by it before it
/// reaches the host.
#[derive(Debug, Clone)]
pub struct SurfaceAdapter {
    origin: Point,
    pass_clip: Option<PRectangle>,
    pen_colour: ColourDesired,
    pen: Point,
    unicode_mode: bool,
    code_page: i32,
    initialised: bool,
    display: DisplayMetrics,
}

impl SurfaceAdapter {
    pub fn new(display: DisplayMetrics) -> Self {
        Self {
            origin: Point::default(),
            pass_clip: None,
            pen_colour: ColourDesired::default(),
            pen: Point::default(),
            unicode_mode: false,
            code_page: 0,
            initialised: false,
            display,
        }
    }

    pub fn init(&mut self) {
        self.initialised = true;
    }

    /// Start a render pass for a window at `origin` whose absolute clip
    /// rectangle is `clip`.
    pub fn begin_pass(&mut self, origin: Point, clip: PRectangle) {
        self.origin = origin;
        self.pass_clip = Some(clip);
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_display(&mut self, display: DisplayMetrics) {
        self.display = display;
    }

    pub fn pen_position(&self) -> Point {
        self.pen
    }

    pub fn unicode_mode(&self) -> bool {
        self.unicode_mode
    }

    pub fn code_page(&self) -> i32 {
        self.code_page
    }

    fn to_host(&self, rc: PRectangle) -> HostRect {
        HostRect::from(rc.translate(self.origin))
    }

    fn draw_text_base(&mut self, rc: PRectangle, font: &Font, text: &[u8], fore: ColourDesired) {
        let rect = self.to_host(rc);
        context::with_current(|host| host.draw_string(&rect, font.id(), HostColor::from(fore), text));
    }
}

impl Surface for SurfaceAdapter {
    fn initialised(&self) -> bool {
        self.initialised
    }

    fn pen_colour(&mut self, fore: ColourDesired) {
        self.pen_colour = fore;
    }

    fn log_pixels_y(&self) -> i32 {
        self.display.dpi
    }

    fn device_height_font(&self, points: i32) -> i32 {
        let log_pix = self.log_pixels_y();
        let height = (points * log_pix + log_pix / 2) / 72;
        log::debug!("device_height_font({points}) => {height}");
        height
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.pen = Point::new(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        crate::fatal!(
            "Surface::line_to",
            "line from ({}, {}) to ({x}, {y}) has no host primitive",
            self.pen.x,
            self.pen.y
        );
    }

    fn polygon(&mut self, pts: &[Point], _fore: ColourDesired, _back: ColourDesired) {
        crate::fatal!("Surface::polygon", "{} points", pts.len());
    }

    fn rectangle_draw(&mut self, rc: PRectangle, fore: ColourDesired, back: ColourDesired) {
        let rect = self.to_host(rc);
        context::with_current(|host| {
            host.fill_rectangle(&rect, HostColor::from(back));
            host.draw_rectangle(&rect, HostColor::from(fore));
        });
    }

    fn fill_rectangle(&mut self, rc: PRectangle, back: ColourDesired) {
        let rect = self.to_host(rc);
        context::with_current(|host| host.fill_rectangle(&rect, HostColor::from(back)));
    }

    fn fill_rectangle_pattern(&mut self, rc: PRectangle, _pattern: &dyn Surface) {
        self.fill_rectangle(rc, PATTERN_FILL);
    }

    fn rounded_rectangle(&mut self, rc: PRectangle, fore: ColourDesired, back: ColourDesired) {
        self.rectangle_draw(rc, fore, back);
    }

    fn alpha_rectangle(
        &mut self,
        rc: PRectangle,
        _corner_size: i32,
        fill: ColourDesired,
        alpha_fill: i32,
        _outline: ColourDesired,
        _alpha_outline: i32,
        _flags: i32,
    ) {
        self.fill_rectangle(rc, fill.with_alpha((alpha_fill & 0xFF) as u8));
    }

    fn ellipse(&mut self, rc: PRectangle, _fore: ColourDesired, _back: ColourDesired) {
        crate::fatal!("Surface::ellipse", "{:?}", rc);
    }

    fn copy(&mut self, rc: PRectangle, _from: Point, _source: &dyn Surface) {
        // Frequently requested, never required for a correct frame.
        log::trace!("Surface::copy({rc:?}) skipped");
    }

    fn draw_rgba_image(&mut self, rc: PRectangle, width: i32, height: i32, _pixels: &[u8]) {
        crate::fatal!("Surface::draw_rgba_image", "{width}x{height} image at {rc:?}");
    }

    fn draw_text_no_clip(
        &mut self,
        rc: PRectangle,
        font: &Font,
        _ybase: f32,
        text: &[u8],
        fore: ColourDesired,
        _back: ColourDesired,
    ) {
        self.draw_text_base(rc, font, text, fore);
    }

    fn draw_text_clipped(
        &mut self,
        rc: PRectangle,
        font: &Font,
        _ybase: f32,
        text: &[u8],
        fore: ColourDesired,
        _back: ColourDesired,
    ) {
        self.draw_text_base(rc, font, text, fore);
    }

    fn draw_text_transparent(&mut self, rc: PRectangle, font: &Font, _ybase: f32, text: &[u8], fore: ColourDesired) {
        self.draw_text_base(rc, font, text, fore);
    }

    fn measure_widths(&self, font: &Font, text: &[u8], positions: &mut [f32]) {
        context::with_current(|host| host.measure_char_positions(font.id(), text, positions));
    }

    fn width_text(&self, font: &Font, text: &[u8]) -> f32 {
        context::with_current(|host| host.measure_string_width(font.id(), text))
    }

    fn width_char(&self, font: &Font, ch: u8) -> f32 {
        context::with_current(|host| host.font_char_width(font.id(), u32::from(ch)))
    }

    fn ascent(&self, font: &Font) -> f32 {
        context::with_current(|host| host.font_ascent(font.id()))
    }

    fn descent(&self, font: &Font) -> f32 {
        context::with_current(|host| host.font_descent(font.id()))
    }

    fn internal_leading(&self, _font: &Font) -> f32 {
        0.0
    }

    fn external_leading(&self, font: &Font) -> f32 {
        context::with_current(|host| host.font_line_gap(font.id()))
    }

    fn height(&self, font: &Font) -> f32 {
        self.ascent(font) + self.descent(font)
    }

    fn average_char_width(&self, font: &Font) -> f32 {
        self.width_char(font, b'n')
    }

    fn set_clip(&mut self, rc: PRectangle) {
        let mut clip = rc.translate(self.origin);
        if let Some(pass) = self.pass_clip {
            clip = clip.intersect(&pass);
        }
        let rect = HostRect::from(clip);
        context::with_current(|host| host.set_clip_rect(&rect));
    }

    fn flush_cached_state(&mut self) {}

    fn set_unicode_mode(&mut self, unicode: bool) {
        self.unicode_mode = unicode;
    }

    fn set_dbcs_mode(&mut self, code_page: i32) {
        self.code_page = code_page;
    }
}
