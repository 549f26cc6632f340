//! Single-screen miner dashboard.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::clock::Clock;
use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::catalog::{self, TaskKind, PREMIUM_PERKS, PREMIUM_PLANS, TASKS};
use super::logic::{check_in_reward, format_number};
use super::state::{UpgradeKind, UserRecord, EXP_PER_LEVEL, REFERRAL_REWARD};
use super::MinerGame;

struct Panel {
    title: &'static str,
    color: Color,
    list: ClickableList<'static>,
}

impl Panel {
    /// Wrapped content rows plus top and bottom border, for a panel
    /// `width` cells wide.
    fn height(&self, width: u16) -> u16 {
        self.list.rows(width.saturating_sub(2)) + 2
    }
}

pub fn render<C: Clock>(
    game: &MinerGame<C>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);
    render_header(game, f, rows[0]);

    let user = game.store.user();
    let left = vec![
        mining_panel(game),
        check_in_panel(game),
        referral_panel(user),
        leaderboard_panel(),
    ];
    let right = vec![upgrades_panel(user), tasks_panel(user), premium_panel(game)];

    if is_narrow_layout(area.width) {
        let mut panels = left;
        panels.extend(right);
        render_column(game, f, rows[1], panels, true, click_state);
    } else {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        render_column(game, f, cols[0], left, true, click_state);
        render_column(game, f, cols[1], right, false, click_state);
    }
}

/// Stack panels at their natural height; the log, if shown, takes the rest.
fn render_column<C: Clock>(
    game: &MinerGame<C>,
    f: &mut Frame,
    area: Rect,
    panels: Vec<Panel>,
    with_log: bool,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut constraints: Vec<Constraint> = panels
        .iter()
        .map(|p| Constraint::Length(p.height(area.width)))
        .collect();
    constraints.push(Constraint::Min(if with_log { 3 } else { 0 }));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (panel, &chunk) in panels.into_iter().zip(chunks.iter()) {
        render_panel(f, chunk, panel, click_state);
    }
    if with_log {
        if let Some(&log_area) = chunks.last() {
            render_log(game, f, log_area);
        }
    }
}

fn render_panel(f: &mut Frame, area: Rect, panel: Panel, click_state: &Rc<RefCell<ClickState>>) {
    if area.height == 0 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(panel.color))
        .title(format!(" {} ", panel.title));
    let inner = block.inner(area);
    panel.list.register_targets(inner, &mut click_state.borrow_mut());

    let widget = Paragraph::new(panel.list.into_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_header<C: Clock>(game: &MinerGame<C>, f: &mut Frame, area: Rect) {
    let user = game.store.user();
    let now = game.store.clock().now_ms();

    let premium = match user.premium_days_left(now) {
        Some(days) => Span::styled(
            format!("  ★ Premium {days}d"),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(""),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "10C Miner  ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} 10C", format_number(user.balance)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            premium,
        ]),
        Line::from(Span::styled(
            format!(
                "Lv {} ({}/{} xp)  Mined {}",
                user.level(),
                user.level_progress(),
                EXP_PER_LEVEL,
                format_number(user.total_mined)
            ),
            Style::default().fg(Color::Gray),
        )),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn mining_panel<C: Clock>(game: &MinerGame<C>) -> Panel {
    let user = game.store.user();
    let pending = game.pending;
    let ratio = user.fill_ratio(pending);

    let mut cl = ClickableList::new();
    cl.push(Line::from(format!(
        "{}/hr · storage {}h",
        user.mining_rate,
        user.capacity_hours()
    )));
    cl.push(Line::from(vec![
        Span::styled(fill_bar(ratio, 16), Style::default().fg(gauge_color(ratio))),
        Span::raw(format!(
            " {}/{}",
            format_number(pending),
            format_number(user.max_pending())
        )),
    ]));
    let label = if user.is_premium {
        format!("Claim {} (x1.5)", format_number(pending))
    } else {
        format!("Claim {}", format_number(pending))
    };
    cl.push_button('c', label, pending > 0, CLAIM);
    if user.upgrades.auto_collect {
        cl.push(Line::from(Span::styled(
            "Auto collector on",
            Style::default().fg(Color::Green),
        )));
    }

    Panel {
        title: "Mining",
        color: Color::Yellow,
        list: cl,
    }
}

fn check_in_panel<C: Clock>(game: &MinerGame<C>) -> Panel {
    let user = game.store.user();
    let today = game.store.clock().today();
    let done_today = user.last_check_in == Some(today);
    let streak_alive = user.last_check_in.is_some() && user.last_check_in == today.pred_opt();

    let mut cl = ClickableList::new();
    cl.push(Line::from(format!("Streak: {} days", user.check_in_streak)));

    let current_day = if done_today || streak_alive {
        user.check_in_streak.min(7)
    } else {
        0
    };
    let preview: Vec<Span> = catalog::check_in_preview()
        .iter()
        .enumerate()
        .map(|(i, reward)| {
            let style = if (i as u32) < current_day {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!("{reward} "), style)
        })
        .collect();
    cl.push(Line::from(preview));

    if done_today {
        cl.push_button('d', "Checked in, come back tomorrow", false, CHECK_IN);
    } else {
        let next_streak = if streak_alive {
            user.check_in_streak.saturating_add(1)
        } else {
            1
        };
        let reward = check_in_reward(next_streak, user.is_premium);
        cl.push_button('d', format!("Check in +{}", format_number(reward)), true, CHECK_IN);
    }

    Panel {
        title: "Daily Check-in",
        color: Color::Green,
        list: cl,
    }
}

fn upgrades_panel(user: &UserRecord) -> Panel {
    let mut cl = ClickableList::new();
    for (i, &kind) in UpgradeKind::all().iter().enumerate() {
        let info = catalog::upgrade_info(kind);
        let level = user.upgrade_level(kind);
        let name = format!("{} Lv{}/{}", info.name, level, kind.max_level());
        let action = BUY_UPGRADE_BASE + i as u16;
        match user.next_upgrade_cost(kind) {
            Some(cost) => cl.push_button(
                UPGRADE_KEYS[i],
                format!(
                    "{} {} → {} ({})",
                    name,
                    info.levels[level],
                    info.levels[level + 1],
                    format_number(cost)
                ),
                user.balance >= cost,
                action,
            ),
            None => cl.push_button(
                UPGRADE_KEYS[i],
                format!("{} {} MAX", name, info.levels[level]),
                false,
                action,
            ),
        }
        cl.push_clickable(
            Line::from(Span::styled(
                format!("     {}", info.description),
                Style::default().fg(Color::DarkGray),
            )),
            action,
        );
    }
    Panel {
        title: "Upgrades",
        color: Color::Cyan,
        list: cl,
    }
}

fn tasks_panel(user: &UserRecord) -> Panel {
    let mut cl = ClickableList::new();
    for (heading, kind) in [("Social", TaskKind::Social), ("Daily", TaskKind::Daily)] {
        cl.push(Line::from(Span::styled(
            heading,
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )));
        for (i, task) in TASKS.iter().enumerate().filter(|(_, t)| t.kind == kind) {
            let done = user.is_task_completed(task.id);
            let label = if done {
                format!("{} ✓", task.title)
            } else {
                format!("{} +{}", task.title, format_number(task.reward))
            };
            let action = COMPLETE_TASK_BASE + i as u16;
            cl.push_button(TASK_KEYS[i], label, !done, action);
            if !done {
                cl.push_clickable(
                    Line::from(Span::styled(
                        format!("     {}", task.description),
                        Style::default().fg(Color::DarkGray),
                    )),
                    action,
                );
            }
        }
    }
    Panel {
        title: "Tasks",
        color: Color::Blue,
        list: cl,
    }
}

fn premium_panel<C: Clock>(game: &MinerGame<C>) -> Panel {
    let user = game.store.user();
    let mut cl = ClickableList::new();

    let status = match user.premium_days_left(game.store.clock().now_ms()) {
        Some(days) => Span::styled(
            format!("Active, {days} days left"),
            Style::default().fg(Color::Magenta),
        ),
        None => Span::styled("Not active", Style::default().fg(Color::DarkGray)),
    };
    cl.push(Line::from(status));
    cl.push(Line::from(Span::styled(
        PREMIUM_PERKS.join(" · "),
        Style::default().fg(Color::Gray),
    )));
    for (i, plan) in PREMIUM_PLANS.iter().enumerate() {
        let star = if plan.popular { " ★" } else { "" };
        cl.push_button(
            PLAN_KEYS[i],
            format!("{} {}{}", plan.label, plan.price, star),
            true,
            ACTIVATE_PLAN_BASE + i as u16,
        );
    }
    Panel {
        title: "Premium",
        color: Color::Magenta,
        list: cl,
    }
}

fn referral_panel(user: &UserRecord) -> Panel {
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::raw("Code "),
        Span::styled(
            user.referral_code.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(Span::styled(
        catalog::referral_link(&user.referral_code),
        Style::default().fg(Color::Gray),
    )));
    cl.push(Line::from(format!(
        "Friends {} · earned {}",
        user.referral_count,
        format_number((user.referral_count as u64).saturating_mul(REFERRAL_REWARD))
    )));
    cl.push(Line::from(Span::styled(
        catalog::share_text(&user.referral_code),
        Style::default().fg(Color::DarkGray),
    )));
    cl.push_button(
        'f',
        format!("Friend joined (+{REFERRAL_REWARD})"),
        true,
        ADD_REFERRAL,
    );
    Panel {
        title: "Friends",
        color: Color::LightBlue,
        list: cl,
    }
}

fn leaderboard_panel() -> Panel {
    let mut cl = ClickableList::new();
    for (i, entry) in catalog::LEADERBOARD.iter().enumerate() {
        cl.push(Line::from(vec![
            Span::styled(format!("#{} ", i + 1), Style::default().fg(Color::Yellow)),
            Span::raw(format!("{:<13}", entry.name)),
            Span::raw(format!("{:>4} friends  ", entry.referrals)),
            Span::styled(
                format!("+{}", format_number(entry.reward)),
                Style::default().fg(Color::Green),
            ),
        ]));
    }
    Panel {
        title: "Top Referrers",
        color: Color::LightBlue,
        list: cl,
    }
}

fn render_log<C: Clock>(game: &MinerGame<C>, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = game.log.len().saturating_sub(visible);

    let lines: Vec<Line> = game.log[start..]
        .iter()
        .map(|entry| {
            let style = if entry.important {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Log "),
    );
    f.render_widget(widget, area);
}

/// Text gauge: `width` cells of filled and empty blocks.
fn fill_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn gauge_color(ratio: f64) -> Color {
    if ratio >= 1.0 {
        Color::Red
    } else if ratio >= 0.8 {
        Color::Yellow
    } else {
        Color::Green
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::miner::save::MemoryStorage;
    use crate::miner::store::MinerStore;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    const NOW: i64 = 1_792_400_000_000;

    fn game() -> MinerGame<Rc<ManualClock>> {
        let clock = Rc::new(ManualClock::new(NOW));
        let mut store = MinerStore::load(clock, Box::new(MemoryStorage::default()));
        store.initialize(None);
        MinerGame::new(store)
    }

    fn text(list: ClickableList<'static>) -> Vec<String> {
        list.into_lines()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn draw(game: &MinerGame<Rc<ManualClock>>, width: u16, height: u16) -> ClickState {
        let cs = Rc::new(RefCell::new(ClickState::new()));
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(game, f, area, &cs);
            })
            .unwrap();
        Rc::try_unwrap(cs).ok().unwrap().into_inner()
    }

    #[test]
    fn fill_bar_widths() {
        assert_eq!(fill_bar(0.0, 4), "░░░░");
        assert_eq!(fill_bar(0.5, 4), "██░░");
        assert_eq!(fill_bar(1.0, 4), "████");
        assert_eq!(fill_bar(3.0, 4), "████");
    }

    #[test]
    fn every_action_has_a_target() {
        let g = game();
        for (w, h) in [(120, 60), (50, 100)] {
            let cs = draw(&g, w, h);
            let ids: Vec<u16> = cs.targets.iter().map(|t| t.action_id).collect();
            assert!(ids.contains(&CLAIM), "claim missing at {w}x{h}");
            assert!(ids.contains(&CHECK_IN));
            assert!(ids.contains(&ADD_REFERRAL));
            for i in 0..UpgradeKind::all().len() as u16 {
                assert!(ids.contains(&(BUY_UPGRADE_BASE + i)));
            }
            for i in 0..TASKS.len() as u16 {
                assert!(ids.contains(&(COMPLETE_TASK_BASE + i)));
            }
            for i in 0..PREMIUM_PLANS.len() as u16 {
                assert!(ids.contains(&(ACTIVATE_PLAN_BASE + i)));
            }
        }
    }

    #[test]
    fn upgrade_rows_show_next_level_and_max() {
        let mut g = game();
        g.store.complete_task("bonus", 10_000);
        g.store.purchase_upgrade(UpgradeKind::AutoCollect);
        let lines = text(upgrades_panel(g.store.user()).list);
        assert_eq!(lines[0], " [1] Mining Speed Lv0/5 10/hr → 25/hr (100)");
        assert_eq!(lines[4], " [3] Auto Collector Lv1/1 Enabled MAX");
    }

    #[test]
    fn completed_task_loses_description() {
        let mut g = game();
        let before = text(tasks_panel(g.store.user()).list).len();
        g.store.complete_task("telegram", 500);
        let lines = text(tasks_panel(g.store.user()).list);
        assert_eq!(lines.len(), before - 1);
        assert_eq!(lines[1], " [Q] Join Telegram Channel ✓");
    }

    #[test]
    fn friends_panel_shows_share_text() {
        let g = game();
        let code = g.store.user().referral_code.clone();
        let lines = text(referral_panel(g.store.user()).list);
        assert_eq!(
            lines[3],
            format!("Join me on 10C and start mining! Use my code: {code}")
        );
        assert_eq!(lines[4], " [F] Friend joined (+100)");
    }

    #[test]
    fn leaderboard_lists_top_referrers() {
        let lines = text(leaderboard_panel().list);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "#1 CryptoKing    156 friends  +10,000");
        assert_eq!(lines[4], "#5 DiamondHands   76 friends  +1,000");
    }

    #[test]
    fn check_in_button_reflects_today() {
        let mut g = game();
        assert_eq!(text(check_in_panel(&g).list)[2], " [D] Check in +60");
        g.store.perform_check_in();
        assert_eq!(
            text(check_in_panel(&g).list)[2],
            " [D] Checked in, come back tomorrow"
        );
    }
}
