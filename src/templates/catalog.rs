use rand::Rng;

use crate::{
    compose::compositor::{DrawContext, Slot},
    filter::{engine::SlotMask, spec::FilterSpec},
    foundation::{
        core::{Point, Rect, Rgba8, TemplateId},
        error::BoothResult,
    },
    render::{
        canvas::{Shadow, stroke_outline},
        text::{FontRole, TextAlign, TextStyle},
    },
    templates::{Template, shapes},
};

/// Distance from the alphabetic baseline up to the visual center of an emoji-sized glyph, in em.
const EMOJI_RISE: f64 = 0.35;

pub(super) static TEMPLATES: [Template; 20] = [
    Template {
        id: TemplateId(1),
        name: "Classic Vertical",
        tag: "Classic",
        description: "3 vertical slots for a timeless feel",
        width: 600,
        height: 900,
        required_photos: 3,
        replaceable_background: true,
        seeded_decoration: false,
        draw: classic_vertical,
    },
    Template {
        id: TemplateId(2),
        name: "Modern Grid",
        tag: "Pro",
        description: "2x2 grid for dynamic shots",
        width: 800,
        height: 800,
        required_photos: 4,
        replaceable_background: true,
        seeded_decoration: false,
        draw: modern_grid,
    },
    Template {
        id: TemplateId(3),
        name: "Retro Polaroid",
        tag: "Vintage",
        description: "Overlapping frames with vintage border",
        width: 800,
        height: 600,
        required_photos: 3,
        replaceable_background: true,
        seeded_decoration: false,
        draw: retro_polaroid,
    },
    Template {
        id: TemplateId(4),
        name: "Minimal Wide",
        tag: "Clean",
        description: "Wide format for cinematic portraits",
        width: 1000,
        height: 400,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: minimal_wide,
    },
    Template {
        id: TemplateId(5),
        name: "Cinematic Circle",
        tag: "Modern",
        description: "Focus on your smile with round frames",
        width: 400,
        height: 1000,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: cinematic_circle,
    },
    Template {
        id: TemplateId(6),
        name: "Vintage Film",
        tag: "Retro",
        description: "Film strip style horizontal shots",
        width: 900,
        height: 350,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: vintage_film,
    },
    Template {
        id: TemplateId(7),
        name: "Pastel 4-Cut",
        tag: "Korean",
        description: "Trendy Korean style 4-cut strip",
        width: 500,
        height: 1100,
        required_photos: 4,
        replaceable_background: false,
        seeded_decoration: false,
        draw: pastel_four_cut,
    },
    Template {
        id: TemplateId(8),
        name: "Neo Tokyo",
        tag: "Cyber",
        description: "High contrast glow and neon accents",
        width: 800,
        height: 800,
        required_photos: 4,
        replaceable_background: false,
        seeded_decoration: false,
        draw: neo_tokyo,
    },
    Template {
        id: TemplateId(9),
        name: "Kawaii Pink",
        tag: "Cute",
        description: "Pastel pink with adorable heart details",
        width: 600,
        height: 950,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: true,
        draw: kawaii_pink,
    },
    Template {
        id: TemplateId(10),
        name: "Y2K Sparkle",
        tag: "Y2K",
        description: "Retro gradients and glitter effects",
        width: 900,
        height: 400,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: y2k_sparkle,
    },
    Template {
        id: TemplateId(11),
        name: "Cloud 9",
        tag: "Dreamy",
        description: "Soft cloud patterns and airy layout",
        width: 800,
        height: 800,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: cloud_nine,
    },
    Template {
        id: TemplateId(12),
        name: "Gallery Wall",
        tag: "Art",
        description: "Artistic collage with varied sizes",
        width: 800,
        height: 800,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: gallery_wall,
    },
    Template {
        id: TemplateId(13),
        name: "Midnight",
        tag: "Dark",
        description: "Elegant deep blues and star patterns",
        width: 600,
        height: 1000,
        required_photos: 4,
        replaceable_background: false,
        seeded_decoration: true,
        draw: midnight,
    },
    Template {
        id: TemplateId(14),
        name: "Sunset Horz",
        tag: "Warm",
        description: "Golden hour vibes with wide frames",
        width: 1000,
        height: 500,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: sunset_horizontal,
    },
    Template {
        id: TemplateId(15),
        name: "Doodle Fun",
        tag: "Handmade",
        description: "Cute hand-drawn border elements",
        width: 600,
        height: 900,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: doodle_fun,
    },
    Template {
        id: TemplateId(16),
        name: "Geometric",
        tag: "Bold",
        description: "Sharp lines and vibrant pop colors",
        width: 800,
        height: 800,
        required_photos: 4,
        replaceable_background: false,
        seeded_decoration: false,
        draw: geometric,
    },
    Template {
        id: TemplateId(17),
        name: "Studio Solo",
        tag: "Minimal",
        description: "High-end single portrait layout",
        width: 800,
        height: 1000,
        required_photos: 1,
        replaceable_background: false,
        seeded_decoration: false,
        draw: studio_solo,
    },
    Template {
        id: TemplateId(18),
        name: "Sticker Bomb",
        tag: "Trendy",
        description: "Decorated with fun virtual stickers",
        width: 800,
        height: 600,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: sticker_bomb,
    },
    Template {
        id: TemplateId(19),
        name: "Hologram",
        tag: "Future",
        description: "Iridescent borders and glow effects",
        width: 900,
        height: 400,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: hologram,
    },
    Template {
        id: TemplateId(20),
        name: "News Retro",
        tag: "Classic",
        description: "Old newspaper style aged finish",
        width: 700,
        height: 1000,
        required_photos: 3,
        replaceable_background: false,
        seeded_decoration: false,
        draw: news_retro,
    },
];

fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

fn fill_background(dc: &mut DrawContext<'_>, color: Rgba8) {
    let bounds = dc.bounds();
    dc.surface().fill_rect(bounds, color);
}

/// Full-canvas gradient from the top-left to the bottom-right corner.
fn diagonal_gradient(dc: &mut DrawContext<'_>, stops: &[Rgba8]) -> BoothResult<()> {
    let bounds = dc.bounds();
    dc.surface()
        .fill_linear_gradient(bounds, Point::ZERO, Point::new(bounds.x1, bounds.y1), stops)
}

fn emoji_center(x: f64, baseline: f64, size: f64) -> Point {
    Point::new(x, baseline - size * EMOJI_RISE)
}

fn classic_vertical(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    let bg = dc.background_or(Rgba8::hex(0xFF5733));
    fill_background(dc, bg);
    let cx = dc.width() / 2.0;
    dc.text(
        "PHOTO BOOTH",
        cx,
        60.0,
        TextStyle::new(FontRole::Sans, 40.0, Rgba8::WHITE).bold(),
    )?;
    for i in 0..3 {
        let y = 100.0 + i as f64 * 260.0;
        dc.surface()
            .stroke_rect(rect(45.0, y - 5.0, 510.0, 240.0), Rgba8::WHITE, 10.0);
        dc.draw_slot(Slot::new(i, rect(50.0, y, 500.0, 230.0)))?;
    }
    let date = dc.date_label();
    dc.text(
        &date,
        60.0,
        860.0,
        TextStyle::new(FontRole::Sans, 20.0, Rgba8::WHITE).align(TextAlign::Left),
    )
}

fn modern_grid(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    let bg = dc.background_or(Rgba8::hex(0x111111));
    fill_background(dc, bg);
    let size = 360.0;
    let positions = [(30.0, 30.0), (410.0, 30.0), (30.0, 410.0), (410.0, 410.0)];
    for (i, (x, y)) in positions.into_iter().enumerate() {
        if !dc.has_image(i) {
            continue;
        }
        dc.surface().stroke_rect(
            rect(x - 5.0, y - 5.0, size + 10.0, size + 10.0),
            Rgba8::WHITE,
            5.0,
        );
        dc.draw_slot(Slot::new(i, rect(x, y, size, size)))?;
    }
    let (cx, bottom) = (dc.width() / 2.0, dc.height() - 20.0);
    dc.text(
        "STUDIO MOMENTS",
        cx,
        bottom,
        TextStyle::new(FontRole::Sans, 20.0, Rgba8::WHITE).bold(),
    )
}

fn retro_polaroid(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    let bg = dc.background_or(Rgba8::hex(0xF4F4F4));
    fill_background(dc, bg);
    let rotations = [-0.1, 0.05, -0.05];
    let positions = [(50.0, 100.0), (250.0, 80.0), (450.0, 120.0)];
    let shadow = Shadow::glow(Rgba8::rgba(0, 0, 0, 51), 20.0);
    for i in 0..3 {
        let (x, y) = positions[i];
        let s = dc.surface();
        s.save();
        s.translate(x + 150.0, y + 180.0);
        s.rotate(rotations[i]);
        let card = rect(-160.0, -170.0, 320.0, 380.0);
        s.draw_shadow(&kurbo::Shape::to_path(&card, 0.1), shadow)?;
        s.fill_rect(card, Rgba8::WHITE);
        dc.draw_slot(Slot::new(i, rect(-150.0, -160.0, 300.0, 300.0)).with_shadow(shadow))?;
        dc.surface().restore();
    }
    Ok(())
}

fn minimal_wide(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::WHITE);
    for i in 0..3 {
        dc.draw_slot(Slot::new(
            i,
            rect(30.0 + i as f64 * 320.0, 30.0, 300.0, 340.0),
        ))?;
    }
    Ok(())
}

fn cinematic_circle(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    diagonal_gradient(dc, &[Rgba8::hex(0x2C3E50), Rgba8::hex(0x000000)])?;
    for i in 0..3 {
        let slot = Slot::new(i, rect(70.0, 50.0 + i as f64 * 300.0, 260.0, 260.0))
            .with_mask(SlotMask::Circle);
        dc.draw_slot(slot)?;
    }
    Ok(())
}

fn vintage_film(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0x111111));
    for i in 0..3 {
        let x = 40.0 + i as f64 * 280.0;
        dc.draw_slot(Slot::new(i, rect(x, 40.0, 260.0, 260.0)))?;
        for j in 0..10 {
            let hx = x + f64::from(j) * 26.0;
            dc.surface()
                .fill_rect(rect(hx, 10.0, 10.0, 15.0), Rgba8::WHITE);
            dc.surface()
                .fill_rect(rect(hx, 325.0, 10.0, 15.0), Rgba8::WHITE);
        }
    }
    Ok(())
}

fn pastel_four_cut(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0xF0E6FF));
    for i in 0..4 {
        if !dc.has_image(i) {
            continue;
        }
        let y = 40.0 + i as f64 * 250.0;
        dc.surface()
            .fill_rect(rect(35.0, y - 5.0, 430.0, 240.0), Rgba8::WHITE);
        dc.draw_slot(Slot::new(i, rect(40.0, y, 420.0, 230.0)))?;
    }
    let cx = dc.width() / 2.0;
    dc.text(
        "LIFE FOUR CUTS",
        cx,
        1060.0,
        TextStyle::new(FontRole::Serif, 24.0, Rgba8::hex(0x9B87F5)).bold(),
    )
}

fn neo_tokyo(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0x050505));
    let colors = [
        Rgba8::hex(0xFF00FF),
        Rgba8::hex(0x00FFFF),
        Rgba8::hex(0xFFFF00),
        Rgba8::hex(0x00FF00),
    ];
    let positions = [(35.0, 35.0), (415.0, 35.0), (35.0, 415.0), (415.0, 415.0)];
    for (i, (x, y)) in positions.into_iter().enumerate() {
        if !dc.has_image(i) {
            continue;
        }
        let frame = rect(x, y, 350.0, 350.0);
        let outline = stroke_outline(&kurbo::Shape::to_path(&frame, 0.1), 4.0);
        dc.surface()
            .draw_shadow(&outline, Shadow::glow(colors[i], 15.0))?;
        dc.surface().fill_path(&outline, colors[i]);
        dc.draw_slot(Slot::new(i, rect(x + 5.0, y + 5.0, 340.0, 340.0)))?;
    }
    Ok(())
}

fn kawaii_pink(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0xFFD1DC));
    let (w, h) = (dc.width(), dc.height());
    let heart_color = Rgba8::rgba(0xFF, 0x69, 0xB4, 0x44);
    for _ in 0..20 {
        let x = dc.rng().gen_range(0.0..w);
        let y = dc.rng().gen_range(0.0..h);
        dc.surface()
            .fill_path(&shapes::heart(emoji_center(x, y, 20.0), 20.0), heart_color);
    }
    for i in 0..3 {
        let y = 60.0 + i as f64 * 280.0;
        dc.surface()
            .fill_rounded_rect(rect(45.0, y - 5.0, 510.0, 260.0), 20.0, Rgba8::WHITE);
        dc.draw_slot(Slot::new(i, rect(50.0, y, 500.0, 250.0)))?;
    }
    dc.text(
        "STAY CUTE",
        w / 2.0,
        920.0,
        TextStyle::new(FontRole::Display, 30.0, Rgba8::hex(0xFF1493)).bold(),
    )
}

fn y2k_sparkle(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    diagonal_gradient(
        dc,
        &[
            Rgba8::hex(0xA18CD1),
            Rgba8::hex(0xFBC2EB),
            Rgba8::hex(0xFAD0C4),
        ],
    )?;
    let glow = Shadow::glow(Rgba8::rgba(255, 255, 255, 128), 20.0);
    for i in 0..3 {
        let x = 40.0 + i as f64 * 280.0;
        dc.draw_slot(Slot::new(i, rect(x, 40.0, 260.0, 320.0)).with_shadow(glow))?;
        let sparkle = shapes::sparkle(emoji_center(x, 30.0, 20.0), 20.0);
        dc.surface().draw_shadow(&sparkle, glow)?;
        dc.surface().fill_path(&sparkle, Rgba8::WHITE);
    }
    Ok(())
}

fn cloud_nine(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0x87CEEB));
    let puff = Rgba8::rgba(255, 255, 255, 128);
    for k in 0..5 {
        let (x, y) = (f64::from(k) * 150.0, 100.0 + f64::from(k) * 100.0);
        dc.surface()
            .fill_circle(Point::new(100.0 + x, y), 50.0, puff);
        dc.surface()
            .fill_circle(Point::new(140.0 + x, y), 60.0, puff);
    }
    let positions = [(80.0, 80.0), (420.0, 150.0), (150.0, 450.0)];
    for (i, (x, y)) in positions.into_iter().enumerate() {
        dc.surface().stroke_rect(
            rect(x - 10.0, y - 10.0, 320.0, 270.0),
            Rgba8::WHITE,
            10.0,
        );
        dc.draw_slot(Slot::new(i, rect(x, y, 300.0, 250.0)))?;
    }
    Ok(())
}

fn gallery_wall(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0xE5E5E5));
    dc.draw_slot(Slot::new(0, rect(40.0, 40.0, 450.0, 550.0)))?;
    dc.draw_slot(Slot::new(1, rect(510.0, 40.0, 250.0, 265.0)))?;
    dc.draw_slot(Slot::new(2, rect(510.0, 325.0, 250.0, 265.0)))?;
    dc.text(
        "EXHIBITION ONE",
        40.0,
        650.0,
        TextStyle::new(FontRole::Sans, 50.0, Rgba8::hex(0x333333))
            .bold()
            .align(TextAlign::Left),
    )
}

fn midnight(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    diagonal_gradient(dc, &[Rgba8::hex(0x000428), Rgba8::hex(0x004E92)])?;
    for _ in 0..50 {
        let x = dc.rng().gen_range(0.0..600.0);
        let y = dc.rng().gen_range(0.0..1000.0);
        let r = dc.rng().gen_range(0.0..2.0);
        dc.surface()
            .fill_circle(Point::new(x, y), r, Rgba8::WHITE);
    }
    let frame_color = Rgba8::rgba(255, 255, 255, 51);
    for i in 0..4 {
        if !dc.has_image(i) {
            continue;
        }
        let y = 60.0 + i as f64 * 220.0;
        dc.surface()
            .stroke_rect(rect(95.0, y - 5.0, 410.0, 200.0), frame_color, 2.0);
        dc.draw_slot(Slot::new(i, rect(100.0, y, 400.0, 190.0)))?;
    }
    Ok(())
}

fn sunset_horizontal(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    diagonal_gradient(dc, &[Rgba8::hex(0xF12711), Rgba8::hex(0xF5AF19)])?;
    for i in 0..3 {
        dc.draw_slot(Slot::new(
            i,
            rect(50.0 + i as f64 * 310.0, 100.0, 280.0, 300.0),
        ))?;
    }
    let cx = dc.width() / 2.0;
    dc.text(
        "GOLDEN HOUR",
        cx,
        60.0,
        TextStyle::new(FontRole::Serif, 40.0, Rgba8::WHITE).bold(),
    )
}

fn doodle_fun(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::WHITE);
    for i in 0..3 {
        let y = 50.0 + i as f64 * 270.0;
        dc.surface().stroke_rounded_rect(
            rect(50.0, y, 500.0, 240.0),
            10.0,
            Rgba8::BLACK,
            3.0,
        );
        dc.draw_slot(Slot::new(i, rect(55.0, y + 5.0, 490.0, 230.0)))?;
        dc.surface().fill_path(
            &shapes::pencil(emoji_center(520.0, y + 20.0, 20.0), 20.0),
            Rgba8::BLACK,
        );
    }
    Ok(())
}

fn geometric(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0xFF6B6B));
    dc.surface().fill_polygon(
        &[
            Point::new(0.0, 0.0),
            Point::new(800.0, 0.0),
            Point::new(0.0, 800.0),
        ],
        Rgba8::hex(0x4ECDC4),
    );
    let positions = [(50.0, 50.0), (450.0, 50.0), (50.0, 450.0), (450.0, 450.0)];
    for (i, (x, y)) in positions.into_iter().enumerate() {
        if !dc.has_image(i) {
            continue;
        }
        dc.surface()
            .fill_rect(rect(x - 10.0, y - 10.0, 320.0, 320.0), Rgba8::WHITE);
        dc.draw_slot(Slot::new(i, rect(x, y, 300.0, 300.0)))?;
    }
    Ok(())
}

fn studio_solo(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::WHITE);
    let ink = Rgba8::hex(0x111111);
    dc.surface()
        .stroke_rect(rect(40.0, 40.0, 720.0, 920.0), ink, 2.0);
    dc.draw_slot(Slot::new(0, rect(60.0, 60.0, 680.0, 800.0)))?;
    let cx = dc.width() / 2.0;
    dc.text(
        "SIGNATURE SERIES",
        cx,
        920.0,
        TextStyle::new(FontRole::Mono, 16.0, ink),
    )
}

fn sticker_bomb(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0xFFFC00));
    let sticker_center = emoji_center(80.0, -80.0, 40.0);
    for i in 0..3 {
        let s = dc.surface();
        s.save();
        s.translate(150.0 + i as f64 * 250.0, 300.0);
        s.rotate((i as f64 - 1.0) * 0.1);
        s.fill_rect(rect(-110.0, -110.0, 220.0, 220.0), Rgba8::WHITE);
        dc.draw_slot(Slot::new(i, rect(-100.0, -100.0, 200.0, 200.0)))?;
        let (path, color) = match i {
            0 => (
                shapes::star(sticker_center, 20.0, 8.5, 5),
                Rgba8::hex(0xFFC83D),
            ),
            1 => (shapes::heart(sticker_center, 40.0), Rgba8::hex(0xFF4F8B)),
            _ => (
                shapes::pizza_slice(sticker_center, 40.0),
                Rgba8::hex(0xF4A534),
            ),
        };
        dc.surface().fill_path(&path, color);
        dc.surface().restore();
    }
    Ok(())
}

fn hologram(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    diagonal_gradient(
        dc,
        &[
            Rgba8::hex(0x00D2FF),
            Rgba8::hex(0x928DAB),
            Rgba8::hex(0x00D2FF),
        ],
    )?;
    for i in 0..3 {
        let x = i as f64 * 280.0;
        dc.surface().push_opacity(0.8);
        dc.surface()
            .stroke_rect(rect(40.0 + x, 40.0, 260.0, 320.0), Rgba8::WHITE, 3.0);
        let drawn = dc.draw_slot(Slot::new(i, rect(45.0 + x, 45.0, 250.0, 310.0)));
        dc.surface().pop_opacity();
        drawn?;
    }
    Ok(())
}

fn news_retro(dc: &mut DrawContext<'_>) -> BoothResult<()> {
    fill_background(dc, Rgba8::hex(0xF4ECD8));
    let ink = Rgba8::hex(0x222222);
    let cx = dc.width() / 2.0;
    dc.text(
        "DAILY CAPTURE",
        cx,
        80.0,
        TextStyle::new(FontRole::Serif, 70.0, ink).bold(),
    )?;
    dc.surface().fill_rect(rect(40.0, 100.0, 620.0, 5.0), ink);
    let grayscale = FilterSpec::IDENTITY.with_saturation(0.0);
    for i in 0..3 {
        let y = 140.0 + i as f64 * 260.0;
        dc.draw_slot(Slot::new(i, rect(50.0, y, 600.0, 230.0)).with_filter(grayscale))?;
        dc.text(
            "LOREM IPSUM DOLOR SIT AMET",
            50.0,
            y + 250.0,
            TextStyle::new(FontRole::Serif, 12.0, ink)
                .italic()
                .align(TextAlign::Left),
        )?;
    }
    dc.surface().fill_rect(rect(40.0, 930.0, 620.0, 2.0), ink);
    Ok(())
}
