use codebench_session::Tab;
use codebench_tree::NodeId;
use codebench_workbench::{
    display_name, file_extension, node_menu, tab_strip_menu, Command, ContextMenu, MenuAction,
    MenuEntry, Outcome, Workbench,
};
use eframe::{egui, App, Frame, NativeOptions};
use egui::{Align, Align2, Color32, Layout, Pos2, RichText, TextStyle};

const APP_TITLE: &str = "CodeBench – Workbench Preview";

struct CodeBenchApp {
    workbench: Workbench,
    context_menu: ContextMenu,
    menu_pos: Pos2,
    rename_target: Option<NodeId>,
    rename_buffer: String,
    rename_focus: bool,
    search_open: bool,
    search_buffer: String,
    last_error: Option<String>,
}

impl Default for CodeBenchApp {
    fn default() -> Self {
        Self {
            workbench: Workbench::with_sample_project(),
            context_menu: ContextMenu::new(),
            menu_pos: Pos2::ZERO,
            rename_target: None,
            rename_buffer: String::new(),
            rename_focus: false,
            search_open: false,
            search_buffer: String::new(),
            last_error: None,
        }
    }
}

impl CodeBenchApp {
    fn run_command(&mut self, command: Command) {
        match self.workbench.apply(command) {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn create_file_and_open(&mut self) {
        let root = self.workbench.tree().root_id();
        match self.workbench.apply(Command::CreateFile {
            context: root,
            name: None,
        }) {
            Ok(Outcome::TreeChanged(diff)) => {
                if let Some(&created) = diff.added.first() {
                    self.run_command(Command::Open { target: created });
                }
            }
            Ok(_) => {}
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn open_node_menu(&mut self, target: NodeId, pos: Pos2) {
        let is_root = self.workbench.tree().parent_of(target).is_none();
        self.context_menu.open(node_menu(target, is_root));
        self.menu_pos = pos;
    }

    fn open_tab_strip_menu(&mut self, pos: Pos2) {
        let has_active = self.workbench.session().active_id().is_some();
        self.context_menu.open(tab_strip_menu(has_active));
        self.menu_pos = pos;
    }

    fn handle_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::NewFile { context } => self.run_command(Command::CreateFile {
                context,
                name: None,
            }),
            MenuAction::NewFolder { context } => self.run_command(Command::CreateFolder {
                context,
                name: None,
            }),
            MenuAction::Rename { target } => self.start_rename(target),
            MenuAction::Delete { target } => self.run_command(Command::RequestDelete { target }),
            MenuAction::CloseOtherTabs => self.run_command(Command::CloseOtherTabs),
        }
    }

    fn start_rename(&mut self, target: NodeId) {
        let Some(name) = self
            .workbench
            .tree()
            .get(target)
            .map(|node| node.name.clone())
        else {
            return;
        };
        self.rename_buffer = name;
        self.rename_target = Some(target);
        self.rename_focus = true;
    }

    fn submit_rename(&mut self, target: NodeId) {
        let name = self.rename_buffer.trim().to_string();
        self.rename_target = None;
        self.rename_buffer.clear();
        if !name.is_empty() {
            self.run_command(Command::Rename { target, name });
        }
    }

    fn cancel_rename(&mut self) {
        self.rename_target = None;
        self.rename_buffer.clear();
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .exact_height(38.0)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    ui.label(RichText::new("CodeBench").strong());
                    ui.separator();
                    if ui.selectable_label(self.search_open, "🔍 Search").clicked() {
                        self.search_open = !self.search_open;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(error) = &self.last_error {
                            ui.label(
                                RichText::new(error)
                                    .color(Color32::from_rgb(239, 68, 68))
                                    .italics(),
                            );
                        }
                    });
                });
            });
    }

    fn show_explorer(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("explorer_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Explorer");
                    ui.separator();
                    let root = self.workbench.tree().root_id();
                    self.render_node(ui, root, 0);
                });
            });
    }

    fn render_node(&mut self, ui: &mut egui::Ui, id: NodeId, depth: usize) {
        let Some(node) = self.workbench.tree().get(id).cloned() else {
            return;
        };

        if self.rename_target == Some(id) {
            self.render_rename_row(ui, id);
            return;
        }

        if node.is_folder() {
            let label = format!("{} {}", file_icon(&node.name, true), node.name);
            let children = node.child_ids().to_vec();
            let header = egui::CollapsingHeader::new(label)
                .id_source(id)
                .default_open(depth < 2)
                .show(ui, |ui| {
                    for child in children {
                        self.render_node(ui, child, depth + 1);
                    }
                });
            if header.header_response.secondary_clicked() {
                if let Some(pos) = header.header_response.interact_pointer_pos() {
                    self.open_node_menu(id, pos);
                }
            }
        } else {
            let is_active = self.workbench.session().active_id() == Some(id);
            let label = format!("{} {}", file_icon(&node.name, false), node.name);
            let response = ui.selectable_label(is_active, label);
            if response.clicked() {
                self.run_command(Command::Open { target: id });
            }
            if response.secondary_clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.open_node_menu(id, pos);
                }
            }
        }
    }

    fn render_rename_row(&mut self, ui: &mut egui::Ui, target: NodeId) {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.rename_buffer).desired_width(f32::INFINITY),
        );
        if self.rename_focus {
            response.request_focus();
            self.rename_focus = false;
        }
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.cancel_rename();
        } else if response.lost_focus() {
            self.submit_rename(target);
        }
    }

    fn show_editor_area(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_tab_strip(ui);
            ui.separator();
            if let Some(payload) = self.workbench.editor_payload() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    let mut buffer = payload.content;
                    let text_edit = egui::TextEdit::multiline(&mut buffer)
                        .font(TextStyle::Monospace)
                        .desired_rows(24)
                        .desired_width(f32::INFINITY);
                    let response = ui.add_sized(ui.available_size(), text_edit);
                    if response.changed() {
                        self.run_command(Command::Edit {
                            target: payload.file_id,
                            content: buffer,
                        });
                    }
                });
            } else {
                self.render_welcome(ui);
            }
        });
    }

    fn render_tab_strip(&mut self, ui: &mut egui::Ui) {
        let tabs: Vec<Tab> = self.workbench.session().tabs().to_vec();
        if tabs.is_empty() {
            return;
        }
        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for (index, tab) in tabs.iter().enumerate() {
                    self.render_tab_button(ui, index, tab, tabs.len());
                }
            });
        });
    }

    fn render_tab_button(&mut self, ui: &mut egui::Ui, index: usize, tab: &Tab, count: usize) {
        let Some(node) = self.workbench.tree().get(tab.node).cloned() else {
            return;
        };

        let mut label = String::new();
        if tab.pinned {
            label.push_str("[P] ");
        }
        label.push_str(&node.name);
        if node.edited() {
            label.push_str(" ●");
        }
        let text = if tab.active {
            RichText::new(label).strong()
        } else {
            RichText::new(label)
        };

        let response = ui.add(egui::Button::new(text).frame(false));
        if response.clicked() {
            self.run_command(Command::Select { target: tab.node });
        }
        if response.secondary_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.open_tab_strip_menu(pos);
            }
        }

        if tab.active && count > 1 {
            if index > 0 {
                let left = egui::Button::new(RichText::new("◀").small()).frame(false);
                if ui.add(left).on_hover_text("Move tab left").clicked() {
                    self.run_command(Command::Reorder {
                        from: index,
                        to: index - 1,
                    });
                }
            }
            if index + 1 < count {
                let right = egui::Button::new(RichText::new("▶").small()).frame(false);
                if ui.add(right).on_hover_text("Move tab right").clicked() {
                    self.run_command(Command::Reorder {
                        from: index,
                        to: index + 1,
                    });
                }
            }
        }

        let pin = egui::Button::new(RichText::new("📌").small()).frame(false);
        if ui.add(pin).on_hover_text("Pin tab").clicked() {
            self.run_command(Command::TogglePin { target: tab.node });
        }
        if !tab.pinned {
            let close = egui::Button::new(RichText::new("✕").small()).frame(false);
            if ui.add(close).on_hover_text("Close tab").clicked() {
                self.run_command(Command::Close { target: tab.node });
            }
        }
        ui.add_space(6.0);
    }

    fn render_welcome(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading(RichText::new("CodeBench").size(32.0));
            ui.label(RichText::new("Editing evolved").weak());
            ui.add_space(12.0);
            if ui.button("New file…").clicked() {
                self.create_file_and_open();
            }
            ui.add_space(6.0);
            ui.label(
                RichText::new("Select a file from the explorer to start editing")
                    .weak()
                    .small(),
            );
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    ui.spacing_mut().item_spacing.x = 10.0;
                    ui.label("⎇ main");
                });
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.spacing_mut().item_spacing.x = 10.0;
                    let active = self.workbench.active();
                    if active.id.is_some() {
                        let lines = active.content.lines().count().max(1);
                        let chars = active.content.chars().count();
                        ui.label(display_name(&active.filename));
                        ui.separator();
                        ui.label("LF");
                        ui.separator();
                        ui.label("UTF-8");
                        ui.separator();
                        ui.label(format!("{lines} lines, {chars} characters"));
                    }
                });
            });
    }

    fn show_search_window(&mut self, ctx: &egui::Context) {
        if !self.search_open {
            return;
        }
        let mut open = self.search_open;
        egui::Window::new("Search")
            .open(&mut open)
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.search_buffer)
                        .hint_text("File name…")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.run_command(Command::SetSearchQuery {
                        query: self.search_buffer.clone(),
                    });
                }
                ui.separator();

                let hits: Vec<(NodeId, String, String)> = self
                    .workbench
                    .search()
                    .results()
                    .iter()
                    .filter_map(|&id| {
                        self.workbench.tree().get(id).map(|node| {
                            let chars = node.content().unwrap_or("").chars().count();
                            let detail = if chars == 0 {
                                "Empty".to_string()
                            } else {
                                format!("{chars} chars")
                            };
                            (id, node.name.clone(), detail)
                        })
                    })
                    .collect();

                if hits.is_empty() {
                    if self.workbench.search().is_active() {
                        ui.label("No files found");
                    } else {
                        ui.label(RichText::new("Type to search file names").weak());
                    }
                } else {
                    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                        for (id, name, detail) in &hits {
                            let label = format!("{} {}", file_icon(name, false), name);
                            ui.horizontal(|ui| {
                                if ui.selectable_label(false, label).clicked() {
                                    self.run_command(Command::Open { target: *id });
                                }
                                ui.label(RichText::new(detail).weak().small());
                            });
                        }
                    });
                }
            });
        self.search_open = open;
    }

    fn show_confirm_dialog(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.workbench.pending_delete().cloned() else {
            return;
        };
        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Are you sure you want to delete '{}'?",
                    pending.name
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        self.run_command(Command::ConfirmDelete);
                    }
                    if ui.button("Cancel").clicked() {
                        self.run_command(Command::CancelDelete);
                    }
                });
            });
    }

    fn show_context_menu(&mut self, ctx: &egui::Context) {
        if !self.context_menu.is_open() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.context_menu.dismiss();
            return;
        }

        let entries: Vec<MenuEntry> = self
            .context_menu
            .entries()
            .map(<[MenuEntry]>::to_vec)
            .unwrap_or_default();
        let mut clicked = None;
        let area = egui::Area::new(egui::Id::new("context_menu"))
            .fixed_pos(self.menu_pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(160.0);
                    for (index, entry) in entries.iter().enumerate() {
                        let button = egui::Button::new(entry.label).frame(false);
                        if ui.add_enabled(!entry.disabled, button).clicked() {
                            clicked = Some(index);
                        }
                    }
                });
            });

        if let Some(index) = clicked {
            if let Some(action) = self.context_menu.invoke(index) {
                self.handle_menu_action(action);
            }
        } else if area.response.clicked_elsewhere() {
            self.context_menu.dismiss();
        }
    }
}

impl App for CodeBenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.show_toolbar(ctx);
        self.show_explorer(ctx);
        self.show_status_bar(ctx);
        self.show_editor_area(ctx);
        self.show_search_window(ctx);
        self.show_confirm_dialog(ctx);
        self.show_context_menu(ctx);
    }
}

fn file_icon(name: &str, is_folder: bool) -> &'static str {
    if is_folder {
        return "📁";
    }
    match file_extension(name).to_lowercase().as_str() {
        "jsx" | "tsx" => "⚛️",
        "ts" => "📘",
        "html" => "🌐",
        "css" | "scss" => "🎨",
        "json" => "📋",
        "md" => "📝",
        "py" => "🐍",
        "java" => "☕",
        "c" | "cpp" => "⚙️",
        "php" => "🐘",
        "rb" => "💎",
        "go" => "🐹",
        "rs" => "🦀",
        _ => "📄",
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting {APP_TITLE}");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1180.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Box::<CodeBenchApp>::default()),
    )
}
