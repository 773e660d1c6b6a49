use anyhow::{Context, Result};
use caselaw_tools::{
    case_url, cases_per_tool, highlight, CaseRecord, Corpus, Fragment, Tally, ToolView,
    TOP_COURTS,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

const PAGE_STEP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Tools,
    Timeline,
    Mentions,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Tools => Page::Timeline,
            Page::Timeline => Page::Mentions,
            Page::Mentions => Page::Tools,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Tools => Page::Mentions,
            Page::Timeline => Page::Tools,
            Page::Mentions => Page::Timeline,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Tools => "Tools",
            Page::Timeline => "Cases per Year",
            Page::Mentions => "Tool Mentions",
        }
    }
}

pub struct App<'a> {
    pub corpus: &'a Corpus,
    pub tools: Vec<(&'a str, usize)>,
    pub tool_state: TableState,
    pub view: ToolView<'a>,
    pub case_state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub detail_scroll: u16,
}

impl<'a> App<'a> {
    pub fn new(corpus: &'a Corpus) -> Result<Self> {
        let tools: Vec<(&str, usize)> = cases_per_tool(&corpus.cases).into_iter().collect();
        let first = tools.first().map(|(name, _)| *name).context("corpus has no tools")?;
        let view = ToolView::new(&corpus.cases, first)?;

        let mut tool_state = TableState::default();
        tool_state.select(Some(0));

        let mut case_state = TableState::default();
        case_state.select(Some(0));

        Ok(Self {
            corpus,
            tools,
            tool_state,
            view,
            case_state,
            current_page: Page::Tools,
            show_detail: true,
            detail_scroll: 0,
        })
    }

    pub fn tool(&self) -> &'a str {
        self.view.tool
    }

    pub fn selected_case(&self) -> Option<&'a CaseRecord> {
        self.case_state.selected().and_then(|i| self.view.case(i))
    }

    /// Switch the per-tool pages to the tool at `index` in the tool table
    pub fn select_tool(&mut self, index: usize) -> Result<()> {
        let Some(&(name, _)) = self.tools.get(index) else {
            return Ok(());
        };

        let corpus = self.corpus;
        self.view = ToolView::new(&corpus.cases, name)?;
        self.tool_state.select(Some(index));
        self.case_state.select(Some(0));
        self.detail_scroll = 0;
        Ok(())
    }

    pub fn next_tool(&mut self) -> Result<()> {
        let i = self.tool_state.selected().unwrap_or(0);
        self.select_tool(wrap_next(i, self.tools.len()))
    }

    pub fn previous_tool(&mut self) -> Result<()> {
        let i = self.tool_state.selected().unwrap_or(0);
        self.select_tool(wrap_previous(i, self.tools.len()))
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    // Row movement applies to the tool table on the Tools page,
    // and to the case list everywhere else
    fn active_list(&mut self) -> (&mut TableState, usize) {
        match self.current_page {
            Page::Tools => (&mut self.tool_state, self.tools.len()),
            _ => (&mut self.case_state, self.view.len()),
        }
    }

    fn move_selection(&mut self, f: impl Fn(usize, usize) -> usize) {
        let (state, len) = self.active_list();
        if len == 0 {
            return;
        }
        let i = f(state.selected().unwrap_or(0), len);
        state.select(Some(i));
        self.detail_scroll = 0;
    }

    pub fn next(&mut self) {
        self.move_selection(wrap_next);
    }

    pub fn previous(&mut self) {
        self.move_selection(wrap_previous);
    }

    pub fn page_down(&mut self) {
        self.move_selection(|i, len| (i + PAGE_STEP).min(len - 1));
    }

    pub fn page_up(&mut self) {
        self.move_selection(|i, _| i.saturating_sub(PAGE_STEP));
    }

    pub fn first(&mut self) {
        self.move_selection(|_, _| 0);
    }

    pub fn last(&mut self) {
        self.move_selection(|_, len| len - 1);
    }

    /// Enter: open the highlighted tool, or toggle the mention panel
    pub fn activate(&mut self) -> Result<()> {
        match self.current_page {
            Page::Tools => {
                let i = self.tool_state.selected().unwrap_or(0);
                self.select_tool(i)?;
                self.current_page = Page::Timeline;
            }
            _ => self.toggle_detail(),
        }
        Ok(())
    }
}

fn wrap_next(i: usize, len: usize) -> usize {
    if i + 1 >= len {
        0
    } else {
        i + 1
    }
}

fn wrap_previous(i: usize, len: usize) -> usize {
    if i == 0 {
        len.saturating_sub(1)
    } else {
        i - 1
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.activate()?,
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Right | KeyCode::Char('l') => app.next_tool()?,
                KeyCode::Left | KeyCode::Char('h') => app.previous_tool()?,
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                KeyCode::Char(']') => app.detail_scroll = app.detail_scroll.saturating_add(1),
                KeyCode::Char('[') => app.detail_scroll = app.detail_scroll.saturating_sub(1),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Tools => render_tools(f, chunks[1], app),
        Page::Timeline => render_timeline(f, chunks[1], app),
        Page::Mentions if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(50), // Case list
                    Constraint::Percentage(50), // Mentions panel
                ])
                .split(chunks[1]);

            render_cases(f, content_chunks[0], app);
            render_mentions(f, content_chunks[1], app);
        }
        Page::Mentions => render_cases(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Tools, Page::Timeline, Page::Mentions];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Tool: {}", app.tool()),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Cases: {}", app.corpus.cases.len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Digital Forensic Tools "),
    );

    f.render_widget(header, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn list_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
}

fn highlight_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

fn render_tools(f: &mut Frame, area: Rect, app: &mut App) {
    let current = app.tool();
    let rows = app.tools.iter().map(|(name, count)| {
        let style = if *name == current {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(name.to_string()).style(style),
            Cell::from(format!("{:>6}", count)),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(32), Constraint::Length(16)])
        .header(header_row(&["Tool", "Number of cases"]))
        .block(list_block(" Cases per Tool (Enter to open) ".to_string()))
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.tool_state);
}

fn render_timeline(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Number of cases per year
    let per_year = app.view.cases_per_year();
    let labels: Vec<String> = per_year.iter().map(|(year, _)| year.to_string()).collect();
    let bars: Vec<(&str, u64)> = labels
        .iter()
        .zip(&per_year)
        .map(|(label, (_, count))| (label.as_str(), *count as u64))
        .collect();

    let chart = BarChart::default()
        .block(list_block(format!(" Number of cases per year - {} ", app.tool())))
        .data(bars.as_slice())
        .bar_width(4)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(chart, chunks[0]);

    let bottom = match &app.corpus.entities {
        Some(_) => Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]),
        None => Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(chunks[1]),
    };

    // Most common courts
    let rows = app
        .view
        .top_courts(TOP_COURTS)
        .into_iter()
        .map(|(court, count)| Row::new(vec![Cell::from(court.to_string()), Cell::from(count.to_string())]));
    let courts = Table::new(rows, [Constraint::Min(20), Constraint::Length(8)])
        .header(header_row(&["Court", "Cases"]))
        .block(list_block(" Most common courts ".to_string()));
    f.render_widget(courts, bottom[0]);

    if let Some(entities) = &app.corpus.entities {
        let mut lines = vec![section_title("People")];
        lines.extend(tally_lines(entities.people(app.tool())));
        lines.push(Line::from(""));
        lines.push(section_title("Organizations"));
        lines.extend(tally_lines(entities.orgs(app.tool())));

        let panel = Paragraph::new(lines).block(list_block(" Named entities ".to_string()));
        f.render_widget(panel, bottom[1]);
    }
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn tally_lines(tally: Option<&Tally>) -> Vec<Line<'static>> {
    match tally {
        Some(t) if !t.is_empty() => t
            .most_common(5)
            .into_iter()
            .map(|(name, count)| Line::from(format!("  {:>4}  {}", count, name)))
            .collect(),
        _ => vec![Line::from(Span::styled(
            "  none",
            Style::default().fg(Color::DarkGray),
        ))],
    }
}

fn render_cases(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.view.cases.iter().map(|rec| {
        let has_text = app.corpus.mentions_for(&rec.link).is_some();
        let color = if has_text { Color::White } else { Color::DarkGray };

        Row::new(vec![
            Cell::from(truncate(&rec.casename, 40)).style(Style::default().fg(color)),
            Cell::from(truncate(&rec.court, 28)),
            Cell::from(rec.year.to_string()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(30),
            Constraint::Length(6),
        ],
    )
    .header(header_row(&["Case", "Court", "Year"]))
    .block(list_block(format!(" Cases for {} (newest first) ", app.tool())))
    .highlight_style(highlight_style())
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.case_state);
}

fn render_mentions(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Tool Mentions ");

    let Some(rec) = app.selected_case() else {
        f.render_widget(Paragraph::new("No case selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let tool = app.tool();

    let mut content = vec![
        Line::from(vec![Span::styled("Case: ", label), Span::raw(rec.casename.as_str())]),
        Line::from(vec![Span::styled("Court: ", label), Span::raw(rec.court.as_str())]),
        Line::from(vec![Span::styled("Year: ", label), Span::raw(rec.year.to_string())]),
        Line::from(vec![
            Span::styled("Original url: ", label),
            Span::styled(case_url(&rec.link), Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
    ];

    match app.corpus.mentions_for(&rec.link) {
        Some(mentions) if !mentions.is_empty() => {
            content.push(Line::from(Span::styled(
                format!("Found {} mentions of {}:", mentions.len(), tool),
                Style::default().fg(Color::Yellow),
            )));
            for mention in mentions {
                content.push(Line::from(""));
                content.push(mention_line(mention, tool));
            }
        }
        _ => content.push(Line::from(Span::styled(
            "Text associated with the case not found or failed to download.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))),
    }

    let panel = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll, 0));

    f.render_widget(panel, area);
}

fn mention_line<'m>(mention: &'m str, tool: &str) -> Line<'m> {
    let spans: Vec<Span> = highlight(mention, tool)
        .into_iter()
        .map(|frag| match frag {
            Fragment::Plain(text) => Span::raw(text),
            Fragment::Tool(text) => Span::styled(
                text,
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
        })
        .collect();
    Line::from(spans)
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (selected, total) = match app.current_page {
        Page::Tools => (app.tool_state.selected(), app.tools.len()),
        _ => (app.case_state.selected(), app.view.len()),
    };
    let selected = selected.map(|i| i + 1).unwrap_or(0);

    let key = Style::default().fg(Color::Yellow);
    let mut status_spans = vec![
        Span::styled(format!(" Row: {}/{} ", selected, total), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled("Tab", key),
        Span::raw(" Page | "),
        Span::styled("←/→", key),
        Span::raw(" Tool | "),
        Span::styled("↑/↓", key),
        Span::raw(" Nav | "),
    ];

    if app.current_page == Page::Mentions {
        status_spans.push(Span::styled("Enter", key));
        status_spans.push(Span::raw(" Mentions | "));
        status_spans.push(Span::styled("[/]", key));
        status_spans.push(Span::raw(" Scroll | "));
    } else if app.current_page == Page::Tools {
        status_spans.push(Span::styled("Enter", key));
        status_spans.push(Span::raw(" Open | "));
    }

    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
