//! Canvas drawing for a `World`. Takes the world by shared reference: drawing can
//! never feed back into the simulation. `now` only drives decorative motion.

use std::f64::consts::{PI, TAU};

use web_sys::CanvasRenderingContext2d;

use super::{Particle, Platform, PlatformKind, Player, World};

pub fn render(world: &World, ctx: &CanvasRenderingContext2d, width: f64, height: f64, now: f64) {
    draw_background(ctx, width, height, now);

    ctx.save();
    ctx.translate(-world.camera.x, 0.0).ok();
    for platform in &world.platforms {
        draw_platform(ctx, platform, now);
    }
    for particle in &world.particles {
        draw_particle(ctx, particle);
    }
    draw_player(ctx, &world.player);
    ctx.restore();
}

fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64, now: f64) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    gradient.add_color_stop(0.0, "#0a0a2e").ok();
    gradient.add_color_stop(0.5, "#16213e").ok();
    gradient.add_color_stop(1.0, "#0f3460").ok();
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, width, height);

    // Drifting molecules
    for i in 0..20 {
        let fi = i as f64;
        let x = (fi * 60.0 + now * 0.01) % (width + 100.0);
        let y = 50.0 + (now * 0.002 + fi).sin() * 30.0;
        let alpha = 0.1 + (now * 0.003 + fi).sin() * 0.1;
        ctx.begin_path();
        ctx.arc(x, y, 3.0, 0.0, TAU).ok();
        ctx.set_fill_style_str(&format!("rgba(0,255,136,{alpha:.3})"));
        ctx.fill();
    }
}

fn draw_platform(ctx: &CanvasRenderingContext2d, p: &Platform, now: f64) {
    match p.kind {
        PlatformKind::Plain => {
            let glow = if p.glowing { 0.8 } else { 0.3 };
            let gradient = ctx.create_linear_gradient(p.x, p.y, p.x, p.y + p.height);
            gradient.add_color_stop(0.0, &format!("rgba(0,255,136,{glow})")).ok();
            gradient.add_color_stop(1.0, &format!("rgba(0,200,100,{})", glow * 0.6)).ok();
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(p.x, p.y, p.width, p.height);

            // Helix rungs
            ctx.set_stroke_style_str(&format!("rgba(0,255,255,{glow})"));
            ctx.set_line_width(2.0);
            ctx.begin_path();
            let mut dx = 0.0;
            while dx < p.width {
                let phase = (dx + now * 0.01) * 0.1;
                let y1 = p.y + 5.0 + phase.sin() * 3.0;
                let y2 = p.y + 15.0 + (phase + PI).sin() * 3.0;
                ctx.move_to(p.x + dx, y1);
                ctx.line_to(p.x + dx, y2);
                dx += 10.0;
            }
            ctx.stroke();
        }
        PlatformKind::Interactive => {
            let glow = if p.glowing { 1.0 } else { 0.5 };
            let gradient = ctx.create_linear_gradient(p.x, p.y, p.x, p.y + p.height);
            gradient.add_color_stop(0.0, &format!("rgba(255,100,255,{glow})")).ok();
            gradient.add_color_stop(1.0, &format!("rgba(200,50,200,{})", glow * 0.6)).ok();
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(p.x, p.y, p.width, p.height);

            // Gene markers
            ctx.set_fill_style_str(&format!("rgba(255,255,255,{glow})"));
            let mut dx = 10.0;
            while dx < p.width {
                ctx.fill_rect(p.x + dx, p.y + 5.0, 4.0, 10.0);
                dx += 30.0;
            }
        }
    }
}

fn draw_particle(ctx: &CanvasRenderingContext2d, pt: &Particle) {
    let (r, g, b) = pt.rgb;
    ctx.set_fill_style_str(&format!("rgba({r},{g},{b},{:.3})", pt.alpha()));
    ctx.begin_path();
    ctx.arc(pt.x, pt.y, 2.0, 0.0, TAU).ok();
    ctx.fill();
}

fn draw_player(ctx: &CanvasRenderingContext2d, player: &Player) {
    ctx.save();
    let cx = player.x + player.width / 2.0;
    let cy = player.y + player.height / 2.0;

    // Shielded players get a soft bubble.
    if player.abilities.shield {
        ctx.set_stroke_style_str("rgba(120,255,200,0.6)");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(cx, cy, player.height * 0.8, 0.0, TAU).ok();
        ctx.stroke();
    }

    ctx.set_shadow_color("#00ffff");
    ctx.set_shadow_blur(15.0);
    match ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, player.width) {
        Ok(suit) => {
            suit.add_color_stop(0.0, "#00ffff").ok();
            suit.add_color_stop(0.7, "#0088ff").ok();
            suit.add_color_stop(1.0, "#004488").ok();
            ctx.set_fill_style_canvas_gradient(&suit);
        }
        Err(_) => ctx.set_fill_style_str("#0088ff"),
    }
    ctx.fill_rect(player.x, player.y, player.width, player.height);

    // Helmet
    ctx.set_fill_style_str("#ffffff");
    ctx.begin_path();
    ctx.arc(cx, player.y + 12.0, 8.0, 0.0, TAU).ok();
    ctx.fill();
    ctx.restore();
}
