//! Screen composition
//!
//! Builds screens from node snapshots. The layout follows the 128x64 OLED
//! the demos were drawn for: an inverted header on row 0, the time bar on
//! row 1 and the play area on rows 2-7 (pixels 16-63).

use core::fmt::Write;

use heapless::String;

use duet_core::config::{NodeConfig, Role};
use duet_core::demos::{
    Balance, BallView, Banner, CounterView, DemoView, IconView, MorseView, Segment, SeesawView,
    SnakeView, COUNTER_BAR_CYCLE,
};
use duet_core::NodeView;
use duet_protocol::{EyeFrame, EyePhase, Icon, MorseSignal};

use crate::screen::{Screen, CELL_WIDTH_PX, SCREEN_COLS, SCREEN_ROWS};

type Line = String<SCREEN_COLS>;

/// Who is drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity<'a> {
    pub name: &'a str,
    pub role: Role,
}

impl<'a> Identity<'a> {
    pub fn from_config(config: &'a NodeConfig) -> Self {
        Self {
            name: config.display_name(),
            role: config.role,
        }
    }

    /// Own side letter as used in the demo captions
    pub fn side(&self) -> &'static str {
        match self.role {
            Role::Master => "A",
            Role::Slave => "B",
        }
    }

    fn peer_letter(&self) -> &'static str {
        match self.role {
            Role::Master => "B",
            Role::Slave => "A",
        }
    }

    fn peer_name(&self) -> &'static str {
        match self.role {
            Role::Master => Role::Slave.default_name(),
            Role::Slave => Role::Master.default_name(),
        }
    }
}

/// Boot splash sequence; the two sides alternate so the pair reads "ESP NOW"
pub fn splash_words(role: Role) -> [&'static str; 3] {
    match role {
        Role::Master => ["ESP", "NOW", "ESP"],
        Role::Slave => ["NOW", "ESP", "NOW"],
    }
}

/// Render one inverted splash word
pub fn compose_splash(screen: &mut Screen, word: &str) {
    screen.clear();
    screen.put_centered(SCREEN_ROWS / 2 - 1, word);
    for row in 0..SCREEN_ROWS {
        screen.set_highlight(row, 0, SCREEN_COLS as u8);
    }
}

/// Render a fatal error screen
pub fn compose_error(screen: &mut Screen, identity: &Identity<'_>, message: &str) {
    screen.clear();
    screen.set_line(0, identity.name);
    screen.set_highlight(0, 0, SCREEN_COLS as u8);
    screen.put_centered(3, "LINK ERROR");
    screen.put_centered(5, message);
}

/// Render a node snapshot
pub fn compose(screen: &mut Screen, view: &NodeView, identity: &Identity<'_>) {
    screen.clear();
    match view {
        NodeView::Searching { dots } => searching(screen, identity, *dots),
        NodeView::Running {
            demo,
            remaining_ms,
            duration_ms,
            view,
        } => {
            screen.put(0, 0, identity.name);
            screen.put(0, 7, demo.name());
            screen.set_highlight(0, 0, SCREEN_COLS as u8);
            time_bar(screen, *remaining_ms, *duration_ms);

            match view {
                DemoView::Eyes(frame) => eyes(screen, frame),
                DemoView::Ball(ball_view) => ball(screen, ball_view),
                DemoView::Icon(icon_view) => icon(screen, icon_view),
                DemoView::Counter(counter_view) => counter(screen, counter_view),
                DemoView::Seesaw(seesaw_view) => seesaw(screen, seesaw_view, identity),
                DemoView::Morse(morse_view) => morse(screen, morse_view),
                DemoView::Snake(snake_view) => snake(screen, snake_view, identity),
            }
        }
    }
}

fn searching(screen: &mut Screen, identity: &Identity<'_>, dots: u8) {
    screen.put(1, 3, identity.name);
    screen.put(3, 1, "Searching for");
    let mut line = Line::new();
    let _ = write!(line, "{}...", identity.peer_name());
    screen.put(5, 1, &line);
    for i in 0..dots as i16 {
        screen.plot(80 + i * 10, 45, b'o');
    }
}

/// Shrinking bar of `=` over a `-` track
fn time_bar(screen: &mut Screen, remaining_ms: u32, duration_ms: u32) {
    let filled = (remaining_ms.min(duration_ms) as u64 * SCREEN_COLS as u64
        / duration_ms.max(1) as u64) as usize;
    screen.fill(1, 0, SCREEN_COLS, b'-');
    screen.fill(1, 0, filled, b'=');
}

fn eyes(screen: &mut Screen, frame: &EyeFrame) {
    const CY: i16 = 38;
    match frame.phase {
        EyePhase::Pair => {
            draw_eye(screen, 32, CY, frame, 2);
            draw_eye(screen, 96, CY, frame, 2);
        }
        EyePhase::Single => draw_eye(screen, 64, CY, frame, 4),
    }
}

fn draw_eye(screen: &mut Screen, cx: i16, cy: i16, frame: &EyeFrame, half_width: i16) {
    let row = (cy / 8) as usize;
    let col = cx / CELL_WIDTH_PX;
    if frame.blink {
        for c in col - half_width + 1..col + half_width {
            screen.put(row, c, "-");
        }
        return;
    }
    screen.put(row, col - half_width, "(");
    screen.put(row, col + half_width, ")");
    screen.plot(cx + frame.ox as i16, cy + frame.oy as i16, b'o');
}

fn ball(screen: &mut Screen, view: &BallView) {
    if let Some((x, y)) = view.position {
        screen.plot(x, y, b'O');
    }
    match view.banner {
        Some(Banner::Sent) => screen.put(3, 5, "SEND >>>"),
        Some(Banner::Received) => screen.put(3, 5, ">>> RECV"),
        None => {}
    }
    let mut line = Line::new();
    let _ = write!(line, "#{}", view.exchanges);
    screen.put(6, 14, &line);
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Heart => "<3",
        Icon::Star => "*",
        Icon::Smile => ":)",
    }
}

fn icon(screen: &mut Screen, view: &IconView) {
    screen.put(2, 0, view.icon.name());
    let glyph = icon_glyph(view.icon);

    if let Some(size) = view.sending_size {
        if size >= 8 {
            screen.put_centered(4, glyph);
        } else if size > 0 {
            screen.plot(64, 36, b'.');
        }
        screen.put(6, 1, "Sending...");
    } else if view.received {
        screen.put_centered(3, glyph);
        if let Some(ring) = view.receive_ring {
            let r = ring as i16 + CELL_WIDTH_PX;
            screen.plot(64 - r, 30, b'(');
            screen.plot(64 + r, 30, b')');
        }
        screen.put(6, 1, "Received!");
    } else {
        screen.put_centered(4, glyph);
    }
}

fn counter(screen: &mut Screen, view: &CounterView) {
    screen.put(2, 0, if view.my_turn { "My turn" } else { "Waiting..." });

    let mut line = Line::new();
    let _ = write!(line, "{}", view.value);
    screen.put_centered(4, &line);

    let track = SCREEN_COLS - 2;
    let filled = view.progress as usize * track / (COUNTER_BAR_CYCLE as usize - 1);
    screen.put(7, 0, "[");
    screen.fill(7, 1, filled.min(track), b'#');
    screen.put(7, SCREEN_COLS as i16 - 1, "]");
}

fn seesaw(screen: &mut Screen, view: &SeesawView, identity: &Identity<'_>) {
    let label = match view.balance {
        Balance::MasterHeavy => "A is heavy!",
        Balance::SlaveHeavy => "B is heavy!",
        Balance::Balanced => "Balanced~",
    };
    screen.put(2, 5, label);

    let off = view.offset as i16;
    // Plank pivots at (64, 46), from (6, 46+off) to (122, 46-off)
    for col in 2..SCREEN_COLS as i16 - 2 {
        let x = col * CELL_WIDTH_PX + CELL_WIDTH_PX / 2;
        let y = 46 + off - 2 * off * (x - 6) / 116;
        screen.plot(x, y, b'=');
    }
    screen.plot(6, 42 + off, b'A');
    screen.plot(116, 42 - off, b'B');
    screen.plot(64, 58, b'^');

    let mut own = Line::new();
    let _ = write!(own, "{}:{:+}", identity.side(), view.offset);
    screen.put(7, 0, &own);

    if let Some(peer) = view.peer_offset {
        let mut line = Line::new();
        let _ = write!(line, "{}:{:+}", identity.peer_letter(), peer);
        screen.put(7, 15, &line);
    }
}

fn morse(screen: &mut Screen, view: &MorseView) {
    let mut line = Line::new();
    let _ = write!(
        line,
        "{} {}",
        if view.sending { "TX >>" } else { "RX <<" },
        view.label
    );
    screen.put(2, 0, &line);

    let mut col = 1;
    for signal in view.symbols.iter().filter(|s| **s != MorseSignal::End) {
        if col >= SCREEN_COLS - 1 {
            break;
        }
        let c = [signal.as_char() as u8];
        screen.put(5, col as i16, core::str::from_utf8(&c).unwrap_or("?"));
        col += 2;
    }
    if view.cursor && col < SCREEN_COLS - 1 {
        screen.put(5, col as i16, "_");
    }

    screen.put(6, 0, ". = dot  - = dash");
}

fn snake(screen: &mut Screen, view: &SnakeView, identity: &Identity<'_>) {
    if view.owned {
        for (i, segment) in view.segments.iter().enumerate().rev() {
            draw_segment(screen, segment, i);
        }
        screen.put(2, 0, "Here! >>>");
    } else {
        screen.put(3, 2, "<<< waiting...");
        for i in 0..view.waiting_dots as i16 {
            screen.plot(20 + i * 10, 46, b'o');
        }
        let mut line = Line::new();
        let _ = write!(line, "{}'s turn", identity.peer_letter());
        screen.put(2, 0, &line);
    }
}

fn draw_segment(screen: &mut Screen, segment: &Segment, index: usize) {
    if !segment.is_visible() {
        return;
    }
    let c = if index == 0 { b'@' } else { b'o' };
    screen.plot(segment.x, segment.y, c);
}
