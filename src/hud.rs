use crate::config::*;
use crate::game::GameState;
use crate::geometry::distance;
use crate::input::PendingActions;
use crate::session::{Action, Session, Snapshot};
use crate::shop::{Availability, ItemKind, ShopSystem, Tone};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// World distance covered by the minimap, from the player to its edge
const MINIMAP_RADIUS: f32 = 400.0;
const MINIMAP_SIZE: f32 = 160.0;

fn tone_color(tone: Tone) -> egui::Color32 {
    match tone {
        Tone::Success => egui::Color32::from_rgb(120, 230, 120),
        Tone::Failure => egui::Color32::from_rgb(255, 120, 100),
    }
}

pub fn menu_ui(mut contexts: EguiContexts, mut next_state: ResMut<NextState<GameState>>) {
    egui::Window::new("Forest Lumberjack")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.label(format!(
                "Chop wood, sell it at the trader's camp and collect {} coins.",
                TARGET_COINS
            ));
            ui.label("Watch out for goblins, foxes and bears.");
            ui.separator();
            ui.label("Controls:");
            ui.label("• Arrows / WASD - Move");
            ui.label("• Space - Chop tree");
            ui.label("• G - Catch goblin    L - Talk to leprechaun");
            ui.label("• E - Eat food    H - Drink potion");
            ui.label("• B - Shop    P - Sell wood    1-4 - Quick buy");
            ui.label("• Mouse Wheel - Zoom    Esc - Menu");
            ui.separator();
            if ui.button("▶ Start (Enter)").clicked() {
                next_state.set(GameState::Playing);
            }
        });
}

pub fn hud_ui(
    mut contexts: EguiContexts,
    session: Option<Res<Session>>,
    mut pending: ResMut<PendingActions>,
) {
    let Some(session) = session else {
        return;
    };
    let snap = session.snapshot();
    let ctx = contexts.ctx_mut();

    egui::Window::new("Lumberjack")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            stats_panel(ui, &snap);
        });

    egui::Window::new("Map")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            minimap(ui, &session, &snap);
        });

    if !snap.notices.is_empty() {
        egui::Area::new(egui::Id::new("notices"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -20.0])
            .show(ctx, |ui| {
                for notice in &snap.notices {
                    ui.colored_label(tone_color(notice.tone), &notice.text);
                }
            });
    }

    if snap.trader_nearby && !snap.shop_active {
        egui::Area::new(egui::Id::new("trader_prompt"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 20.0])
            .show(ctx, |ui| {
                ui.label("Trader: B to open the shop, P to sell wood");
            });
    }

    if snap.shop_active {
        egui::Window::new("Trader")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                shop_panel(ui, &session, &snap, &mut pending);
            });
    }
}

fn stats_panel(ui: &mut egui::Ui, snap: &Snapshot) {
    let p = &snap.player;

    let health_ratio = p.health as f32 / p.max_health as f32;
    ui.add(
        egui::ProgressBar::new(health_ratio).text(format!("Health {} / {}", p.health, p.max_health)),
    );
    let energy_ratio = p.energy as f32 / p.max_energy as f32;
    ui.add(
        egui::ProgressBar::new(energy_ratio).text(format!("Energy {} / {}", p.energy, p.max_energy)),
    );

    ui.separator();
    ui.label(format!("Coins: {} / {}", p.coins, snap.target_coins));
    ui.label(format!("Wood: {}", p.wood));
    ui.label(format!("Food: {}   Potions: {}", p.food, p.potions));
    if p.has_better_axe {
        ui.label("Better axe");
    }
    if let Some(remaining) = p.protection_remaining {
        ui.label(format!("Protected: {:.0}s", remaining));
    }
    if p.catch_cooldown > 0.0 {
        ui.colored_label(egui::Color32::GRAY, format!("Catch ready in {:.1}s", p.catch_cooldown));
    }

    ui.separator();
    ui.label(format!(
        "Trees: {}   Creatures: {}   Time: {:.0}s",
        snap.living_trees, snap.creatures, snap.elapsed
    ));
}

fn shop_panel(ui: &mut egui::Ui, session: &Session, snap: &Snapshot, pending: &mut PendingActions) {
    ui.label(format!("You have {} coins and {} wood.", snap.player.coins, snap.player.wood));
    if ui.button(format!("Sell all wood ({} each)", WOOD_PRICE)).clicked() {
        pending.push(Action::SellWood);
    }
    ui.separator();

    for (slot, kind) in ItemKind::ALL.into_iter().enumerate() {
        let listing = kind.listing();
        let availability = ShopSystem::availability(&session.player, kind);
        ui.horizontal(|ui| {
            let label = format!("{}. {} - {} coins", slot + 1, listing.name, listing.price);
            let button = ui.add_enabled(
                availability == Availability::Available,
                egui::Button::new(label),
            );
            if button.clicked() {
                pending.push(Action::QuickBuy(kind));
            }
            match availability {
                Availability::Available => ui.label(listing.description),
                Availability::TooExpensive => {
                    ui.colored_label(egui::Color32::GRAY, listing.description)
                }
                Availability::Owned => ui.colored_label(egui::Color32::GRAY, "(active)"),
            };
        });
    }

    if let Some(msg) = &snap.shop_message {
        ui.separator();
        ui.colored_label(tone_color(msg.tone), &msg.text);
    }
    ui.separator();
    if ui.button("Close (B)").clicked() {
        pending.push(Action::ToggleShop);
    }
}

/// Local map around the player. Scenery comes from the world's area query,
/// trees and creatures from the snapshot.
fn minimap(ui: &mut egui::Ui, session: &Session, snap: &Snapshot) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(MINIMAP_SIZE, MINIMAP_SIZE),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, egui::Rounding::same(4.0), egui::Color32::from_rgb(30, 60, 30));

    let centre = snap.player.position;
    let in_range = |pos: Vec2| distance(pos, centre) <= MINIMAP_RADIUS;
    let scale = MINIMAP_SIZE / 2.0 / MINIMAP_RADIUS;
    let to_map = |pos: Vec2| {
        let d = (pos - centre) * scale;
        rect.center() + egui::vec2(d.x, d.y)
    };

    let area = session.forest.objects_in_area(centre, MINIMAP_RADIUS);
    for bush in &area.bushes {
        painter.circle_filled(to_map(bush.position), 1.5, egui::Color32::from_rgb(60, 120, 60));
    }
    for rock in &area.rocks {
        painter.circle_filled(to_map(rock.position), 2.0, egui::Color32::GRAY);
    }
    for tree in snap.trees.iter().filter(|t| t.alive && in_range(t.position)) {
        painter.circle_filled(to_map(tree.position), 2.5, egui::Color32::from_rgb(40, 160, 40));
    }
    for fence in &session.forest.fences {
        let fence_rect = egui::Rect::from_min_max(to_map(fence.min), to_map(fence.max));
        if fence_rect.intersects(rect) {
            painter.rect_filled(fence_rect, egui::Rounding::ZERO, egui::Color32::from_rgb(140, 90, 50));
        }
    }
    for agent in snap.agents.iter().filter(|a| in_range(a.position)) {
        let color = if agent.species.is_hostile() {
            egui::Color32::from_rgb(220, 60, 60)
        } else {
            egui::Color32::from_rgb(230, 230, 120)
        };
        painter.circle_filled(to_map(agent.position), 2.0, color);
    }

    let trader = to_map(session.trader_position);
    if rect.contains(trader) {
        painter.rect_filled(
            egui::Rect::from_center_size(trader, egui::vec2(6.0, 6.0)),
            egui::Rounding::same(1.0),
            egui::Color32::GOLD,
        );
    }
    painter.circle_filled(rect.center(), 3.0, egui::Color32::from_rgb(80, 140, 255));
}

pub fn end_screen_ui(
    mut contexts: EguiContexts,
    state: Res<State<GameState>>,
    session: Option<Res<Session>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let victory = *state.get() == GameState::Victory;
    let title = if victory { "Victory!" } else { "Game Over" };

    egui::Window::new(title)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            if victory {
                ui.label(format!("You earned {} coins. The forest is yours.", TARGET_COINS));
            } else {
                ui.label("The forest got the better of you.");
            }
            if let Some(session) = &session {
                let p = &session.player;
                ui.label(format!("Coins: {}   Wood: {}", p.coins, p.wood));
                ui.label(format!("Time survived: {:.0}s", session.elapsed));
            }
            ui.separator();
            if ui.button("Back to menu (Enter)").clicked() {
                next_state.set(GameState::Menu);
            }
        });
}
