use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, Hsla, PathBuilder, Pixels, Point,
    Window, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle};

use super::text::shape_label;

/// Thinnest stroke GPUI still rasterizes reliably.
const MIN_STROKE_WIDTH: f32 = 0.5;

/// Replays a [`RenderList`] into a window, tracking nested clip rectangles.
struct Painter<'a> {
    window: &'a mut Window,
    cx: &'a mut App,
    clips: Vec<ContentMask<Pixels>>,
}

impl Painter<'_> {
    fn command(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::ClipRect(rect) => {
                // Nested clips intersect with the enclosing one.
                let bounds = match self.clips.last() {
                    Some(outer) => outer.bounds.intersect(&bounds_of(*rect)),
                    None => bounds_of(*rect),
                };
                self.clips.push(ContentMask { bounds });
            }
            RenderCommand::ClipEnd => {
                self.clips.pop();
            }
            RenderCommand::LineSegments { segments, style } => self.lines(segments, *style),
            RenderCommand::Rect { rect, style } => self.rect(*rect, *style),
            RenderCommand::Text {
                position,
                text,
                style,
            } => self.text(*position, text, style),
        }
    }

    fn clipped(&mut self, f: impl FnOnce(&mut Window, &mut App)) {
        let cx = &mut *self.cx;
        match self.clips.last() {
            Some(mask) => self
                .window
                .with_content_mask(Some(mask.clone()), |window| f(window, cx)),
            None => f(self.window, cx),
        }
    }

    fn lines(&mut self, segments: &[LineSegment], style: LineStyle) {
        if segments.is_empty() {
            return;
        }
        let mut path = PathBuilder::stroke(px(style.width.max(MIN_STROKE_WIDTH)));
        for segment in segments {
            path.move_to(pixel_point(segment.start));
            path.line_to(pixel_point(segment.end));
        }
        let Ok(path) = path.build() else {
            return;
        };
        let color = rgba(style.color);
        self.clipped(|window, _| window.paint_path(path, color));
    }

    fn rect(&mut self, rect: ScreenRect, style: RectStyle) {
        let quad = quad(
            bounds_of(rect),
            Corners::all(px(0.0)),
            rgba(style.fill),
            Edges::all(px(style.stroke_width)),
            rgba(style.stroke),
            BorderStyle::default(),
        );
        self.clipped(|window, _| window.paint_quad(quad));
    }

    fn text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let line = shape_label(self.window, text, style.size, hsla(style.color));
        let line_height = line.ascent + line.descent;
        self.clipped(|window, cx| {
            // A label that fails to paint is skipped; the next frame retries.
            let _ = line.paint(pixel_point(position), line_height, window, cx);
        });
    }
}

/// Paint every command of `list` in order.
pub(crate) fn paint_list(list: &RenderList, window: &mut Window, cx: &mut App) {
    let mut painter = Painter {
        window,
        cx,
        clips: Vec::new(),
    };
    for command in list.commands() {
        painter.command(command);
    }
}

fn rgba(color: Color) -> gpui::Rgba {
    let Color { r, g, b, a } = color;
    gpui::Rgba { r, g, b, a }
}

pub(crate) fn hsla(color: Color) -> Hsla {
    Hsla::from(rgba(color))
}

fn pixel_point(screen: ScreenPoint) -> Point<Pixels> {
    point(px(screen.x), px(screen.y))
}

fn bounds_of(rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(pixel_point(rect.min), pixel_point(rect.max))
}

pub(crate) fn screen_rect_of(bounds: Bounds<Pixels>) -> ScreenRect {
    ScreenRect::from_origin_size(
        f32::from(bounds.origin.x),
        f32::from(bounds.origin.y),
        f32::from(bounds.size.width),
        f32::from(bounds.size.height),
    )
}
