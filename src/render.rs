//! Canvas 2D render adapter
//!
//! Paints a read-only snapshot of the simulation each frame. Nothing here
//! feeds back into the sim; the HUD's DOM pieces live in the host shell.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::{AmmoKind, GameState};

/// Fill/accent color per ammo type
pub fn ammo_color(kind: AmmoKind) -> &'static str {
    match kind {
        AmmoKind::Normal => "#fff",
        AmmoKind::Piercing => "#0ff",
        AmmoKind::Explosive => "#ff0",
    }
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Paint one frame from the simulation snapshot
    pub fn render(&self, state: &GameState) {
        let ctx = &self.ctx;
        let (w, h) = (state.bounds.x as f64, state.bounds.y as f64);
        ctx.clear_rect(0.0, 0.0, w, h);

        // Bombers: yellow, flagged so they read differently from soldiers
        for bomber in &state.bombers {
            let b = bomber.aabb;
            ctx.set_fill_style_str("#ff0");
            ctx.fill_rect(
                b.pos.x as f64,
                b.pos.y as f64,
                b.size.x as f64,
                b.size.y as f64,
            );
            ctx.set_fill_style_str("#f00");
            ctx.set_font("bold 24px sans-serif");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let c = b.center();
            let _ = ctx.fill_text("!", c.x as f64, c.y as f64);
        }

        // Player: gold while invincible, red when out of magazines
        let p = state.player.aabb;
        if state.invincibility.active {
            ctx.set_fill_style_str("#ffd700");
        } else if state.loadout.reserves == 0 {
            ctx.set_fill_style_str("#f00");
        } else {
            ctx.set_fill_style_str("#0ff");
        }
        ctx.fill_rect(
            p.pos.x as f64,
            p.pos.y as f64,
            p.size.x as f64,
            p.size.y as f64,
        );

        // Status outline: reloading beats empty beats invincible
        let outline = if state.loadout.is_reloading() {
            Some(("#ffa500", 3.0))
        } else if state.loadout.magazine == 0 {
            Some(("#f00", 3.0))
        } else if state.invincibility.active {
            Some(("#ffd700", 4.0))
        } else {
            None
        };
        if let Some((color, width)) = outline {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(width);
            ctx.stroke_rect(
                p.pos.x as f64,
                p.pos.y as f64,
                p.size.x as f64,
                p.size.y as f64,
            );
        }

        // Projectiles, colored by type
        for round in &state.projectiles {
            ctx.set_fill_style_str(ammo_color(round.kind));
            let r = round.aabb;
            ctx.fill_rect(
                r.pos.x as f64,
                r.pos.y as f64,
                r.size.x as f64,
                r.size.y as f64,
            );
        }

        // Explosions: fading two-tone blast
        for explosion in &state.explosions {
            let alpha = (explosion.life / explosion.max_life) as f64;
            ctx.save();
            ctx.set_global_alpha(alpha.clamp(0.0, 1.0));

            ctx.set_fill_style_str("#ff8800");
            ctx.begin_path();
            let _ = ctx.arc(
                explosion.pos.x as f64,
                explosion.pos.y as f64,
                explosion.radius as f64,
                0.0,
                TAU,
            );
            ctx.fill();

            ctx.set_fill_style_str("#ffff00");
            ctx.begin_path();
            let _ = ctx.arc(
                explosion.pos.x as f64,
                explosion.pos.y as f64,
                explosion.radius as f64 * 0.6,
                0.0,
                TAU,
            );
            ctx.fill();

            ctx.restore();
        }

        // Soldiers: red
        for soldier in &state.soldiers {
            let s = soldier.aabb;
            ctx.set_fill_style_str("#f00");
            ctx.fill_rect(
                s.pos.x as f64,
                s.pos.y as f64,
                s.size.x as f64,
                s.size.y as f64,
            );
        }

        // Magazine pickups: green
        ctx.set_fill_style_str("#0f0");
        for pickup in &state.magazines {
            let m = pickup.aabb;
            ctx.fill_rect(
                m.pos.x as f64,
                m.pos.y as f64,
                m.size.x as f64,
                m.size.y as f64,
            );
        }

        // Stars: purple disc with a white rim
        for pickup in &state.stars {
            let c = pickup.aabb.center();
            let radius = pickup.aabb.size.x as f64 / 2.0;
            ctx.set_fill_style_str("#d800ff");
            ctx.begin_path();
            let _ = ctx.arc(c.x as f64, c.y as f64, radius, 0.0, TAU);
            ctx.fill();
            ctx.set_stroke_style_str("#fff");
            ctx.set_line_width(2.0);
            ctx.stroke();
        }

        self.draw_hud(state, w);
    }

    /// Ammo readout and warnings drawn on the canvas itself
    fn draw_hud(&self, state: &GameState, w: f64) {
        let ctx = &self.ctx;
        let font_px = (w / 24.0).clamp(14.0, 20.0);

        ctx.set_fill_style_str("#fff");
        ctx.set_font(&format!("{font_px}px sans-serif"));
        ctx.set_text_align("left");
        ctx.set_text_baseline("top");
        let ammo_line = if state.loadout.is_reloading() {
            "Reloading...".to_string()
        } else {
            format!(
                "Ammo: {} / {}  Magazines: {}",
                state.loadout.magazine, MAGAZINE_SIZE, state.loadout.reserves
            )
        };
        let _ = ctx.fill_text(&ammo_line, 10.0, 10.0);

        ctx.set_fill_style_str(ammo_color(state.loadout.selected));
        let _ = ctx.fill_text(
            &format!("Type: {}", state.loadout.selected.label()),
            10.0,
            35.0,
        );

        // Low-ammo warnings, centered
        if !state.game_over && !state.loadout.is_reloading() {
            ctx.set_text_align("center");
            let magazine = state.loadout.magazine;
            let reserves = state.loadout.reserves;
            if magazine > 0 && magazine <= 3 {
                ctx.set_fill_style_str("#ff0");
                ctx.set_font("bold 24px sans-serif");
                let _ = ctx.fill_text(&format!("{magazine} rounds left!"), w / 2.0, 60.0);
            } else if magazine == 0 && reserves > 0 {
                ctx.set_fill_style_str("#f00");
                ctx.set_font("bold 28px sans-serif");
                let _ = ctx.fill_text("Reload!", w / 2.0, 60.0);
            } else if reserves == 0 && magazine <= 5 {
                ctx.set_fill_style_str("#f00");
                ctx.set_font("bold 24px sans-serif");
                let _ = ctx.fill_text(
                    &format!("Out of magazines! {magazine} rounds left"),
                    w / 2.0,
                    60.0,
                );
            }
            ctx.set_text_align("left");
        }

        // Invincibility countdown
        if state.invincibility.active {
            ctx.set_fill_style_str("#ffd700");
            ctx.set_font("bold 28px sans-serif");
            ctx.set_text_align("center");
            let _ = ctx.fill_text(
                &format!("Invincible: {}s", state.invincibility.remaining.ceil() as u32),
                w / 2.0,
                40.0,
            );
            ctx.set_text_align("left");
        }
    }
}
