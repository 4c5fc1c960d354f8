//! UI rendering for task manager.

use crate::app::{App, InputField, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
    Frame,
};
use task_core::{today, Priority, Status, Task};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.view {
        View::List => draw_list_view(f, app, chunks[1]),
        View::Board => draw_board_view(f, app, chunks[1]),
        View::Categories => draw_categories_view(f, app, chunks[1]),
        View::Agenda => draw_agenda_view(f, app, chunks[1]),
    }

    draw_status_bar(f, app, chunks[2]);

    if app.editing {
        draw_input_dialog(f, app);
    }

    if app.show_help {
        draw_help(f);
    }
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["[1] List", "[2] Board", "[3] Categories", "[4] Agenda"];
    let selected = match app.view {
        View::List => 0,
        View::Board => 1,
        View::Categories => 2,
        View::Agenda => 3,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Task Manager "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    f.render_widget(tabs, area);
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Blue,
    }
}

fn task_item<'a>(app: &App, task: &Task, selected: bool) -> ListItem<'a> {
    let today = today();

    let mut style = Style::default();
    if task.is_completed() {
        style = style.fg(Color::DarkGray);
    } else if task.is_overdue_on(today) {
        style = style.fg(Color::Red);
    } else if task.is_due_on(today) {
        style = style.fg(Color::Yellow);
    }
    if selected {
        style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw(format!("{} ", task.status().symbol())),
        Span::styled(
            format!("{} ", task.priority().symbol()),
            Style::default().fg(priority_color(task.priority())),
        ),
        Span::raw(task.title().to_string()),
    ];

    if app.config.display.show_due_date {
        if let Some(due) = task.due_date() {
            spans.push(Span::raw(format!(" [{}]", app.config.display.format_date(due))));
        }
    }
    if app.config.display.show_category {
        if let Some(category) = task.category() {
            spans.push(Span::raw(format!(" @{}", category)));
        }
    }
    if let Some(recurrence) = task.recurrence() {
        spans.push(Span::raw(format!(" ↻{}", recurrence.as_str())));
    }
    if task.is_pending() && task.is_overdue_on(today) {
        spans.push(Span::styled(" OVERDUE", Style::default().add_modifier(Modifier::BOLD)));
    }

    ListItem::new(Line::from(spans)).style(style)
}

fn draw_list_view(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .visible_tasks()
        .into_iter()
        .enumerate()
        .map(|(i, task)| task_item(app, task, i == app.selected_index))
        .collect();

    let direction = if app.sort_ascending { "↑" } else { "↓" };
    let mut title = format!(" Tasks ({}) | Sort: {} {} ", items.len(), app.sort_field.label(), direction);
    if let Some(status) = app.filter.status {
        title.push_str(&format!("| {} ", status.label()));
    }
    if !app.filter.search.is_empty() {
        title.push_str(&format!("| /{} ", app.filter.search));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(list, area);
}

fn draw_board_view(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let selected = app.selected_id();
    let statuses = [
        (Status::Pending, Color::Cyan),
        (Status::Completed, Color::Green),
    ];

    for (i, (status, color)) in statuses.iter().enumerate() {
        let tasks: Vec<ListItem> = app
            .visible_by_status(*status)
            .into_iter()
            .map(|task| task_item(app, task, selected.as_deref() == Some(task.id())))
            .collect();

        let block_title = format!(" {} ({}) ", status.label(), tasks.len());

        let list = List::new(tasks)
            .block(Block::default()
                .borders(Borders::ALL)
                .title(block_title)
                .border_style(Style::default().fg(*color)));

        f.render_widget(list, columns[i]);
    }
}

fn draw_categories_view(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let summary: Vec<ListItem> = app
        .categories
        .iter()
        .map(|(name, count)| ListItem::new(format!("{} ({})", name, count)))
        .collect();
    let summary = List::new(summary)
        .block(Block::default().borders(Borders::ALL).title(" Categories "));
    f.render_widget(summary, columns[0]);

    let items: Vec<ListItem> = app
        .visible_tasks()
        .into_iter()
        .enumerate()
        .map(|(i, task)| task_item(app, task, i == app.selected_index))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Tasks by category "));
    f.render_widget(list, columns[1]);
}

fn draw_agenda_view(f: &mut Frame, app: &App, area: Rect) {
    let tasks = app.visible_tasks();
    let (overdue, upcoming) = tasks.split_at(app.overdue_count.min(tasks.len()));

    let mut items: Vec<ListItem> = Vec::new();
    items.push(ListItem::new(Line::from(Span::styled(
        format!("Overdue ({})", overdue.len()),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))));
    for (i, task) in overdue.iter().enumerate() {
        items.push(task_item(app, task, i == app.selected_index));
    }

    items.push(ListItem::new(Line::from(Span::styled(
        format!("Next {} days ({})", app.config.filters.upcoming_days, upcoming.len()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))));
    for (i, task) in upcoming.iter().enumerate() {
        items.push(task_item(app, task, overdue.len() + i == app.selected_index));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Agenda "));
    f.render_widget(list, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Stats
    let stats = format!(
        "Total: {} | Pending: {} | Done: {} ({}%) | Overdue: {} | Today: {}",
        app.stats.total,
        app.stats.pending,
        app.stats.completed,
        app.completion.completion_percentage,
        app.stats.overdue,
        app.stats.due_today,
    );
    let stats_widget = Paragraph::new(stats)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(stats_widget, chunks[0]);

    // Message or help hint
    let msg = app.message.clone().unwrap_or_else(|| "? for help | q to quit".to_string());
    let msg_widget = Paragraph::new(msg)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(msg_widget, chunks[1]);
}

fn draw_input_dialog(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);

    let title = match app.input_field {
        InputField::TaskTitle => " New Task ",
        InputField::Category => " Category (empty clears) ",
        InputField::DueDate => " Due Date YYYY-MM-DD (empty clears) ",
        InputField::RenameCategory => " Rename Category ",
        InputField::Search => " Search ",
        InputField::None => " Input ",
    };

    let input = Paragraph::new(app.input_buffer.as_str())
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Yellow));

    f.render_widget(input, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from(Span::styled("Navigation", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  j/k or arrows  Move selection"),
        Line::from("  g/G            Go to first/last"),
        Line::from("  1-4            Switch views"),
        Line::from(""),
        Line::from(Span::styled("Actions", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  a              Add task"),
        Line::from("  Enter/Space    Toggle complete"),
        Line::from("  d              Delete task"),
        Line::from("  p              Cycle priority"),
        Line::from("  r              Cycle recurrence"),
        Line::from("  C              Edit category"),
        Line::from("  D              Edit due date"),
        Line::from("  R              Rename category"),
        Line::from(""),
        Line::from(Span::styled("Filters", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  /              Search"),
        Line::from("  f              Cycle status filter"),
        Line::from("  s/S            Sort field/direction"),
        Line::from("  c              Toggle completed"),
        Line::from("  Esc            Clear filters"),
        Line::from(""),
        Line::from("  q              Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
