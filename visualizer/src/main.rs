use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wardrivecore::analysis::Bucket;
use wardrivecore::cluster::RenderPlan;

fn main() -> iced::Result {
    iced::application(MapView::boot, MapView::update, MapView::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &MapView) -> String {
    "Wardriving Dashboard Visualizer".into()
}

fn application_subscription(_: &MapView) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &MapView) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct MapView {
    form: ViewForm,
    payload: Option<DashboardPayload>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<DashboardPayload, String>),
    ViewFieldChanged(ViewField, String),
    SubmitView,
    ViewSubmitted(Result<String, String>),
    DismissStatus,
}

#[derive(Debug, Clone, Copy)]
enum ViewField {
    Zoom,
    AuthFilter,
    Search,
}

impl MapView {
    fn boot() -> (Self, Task<Message>) {
        (
            MapView {
                form: ViewForm::default(),
                payload: None,
                status: "Waiting for dashboard bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                if !payload.has_data() {
                    state.status = "No data: every source failed or was empty.".into();
                }
                state.push_history(format!(
                    "Snapshot: {} networks, {} clusters, {} markers",
                    payload.filtered_networks,
                    payload.plan.glyphs.len(),
                    payload.plan.markers.len()
                ));
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                // The bridge being unreachable is a notice, not a crash.
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::ViewFieldChanged(field, value) => {
                state.form.update_field(field, value);
                Task::none()
            }
            Message::SubmitView => {
                let payload = state.form.to_payload();
                Task::perform(post_view(payload), Message::ViewSubmitted)
            }
            Message::ViewSubmitted(Ok(message)) => {
                state.status = message;
                state.push_history("View submitted".into());
                Task::none()
            }
            Message::ViewSubmitted(Err(err)) => {
                state.status = format!("View error: {err}");
                Task::none()
            }
            Message::DismissStatus => {
                state.status.clear();
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let plan = state
            .payload
            .as_ref()
            .map(|payload| payload.plan.clone())
            .unwrap_or_default();
        let analysis = state
            .payload
            .as_ref()
            .map(|payload| payload.analysis.clone())
            .unwrap_or_default();

        let form_column = column![
            text("Map View").size(26),
            text_input("Zoom (5-18)", &state.form.zoom)
                .on_input(|value| Message::ViewFieldChanged(ViewField::Zoom, value))
                .padding(6),
            text_input("Filter: all | wpa | wpa2 | wpa3 | open", &state.form.auth_filter)
                .on_input(|value| Message::ViewFieldChanged(ViewField::AuthFilter, value))
                .padding(6),
            text_input("Search SSID or BSSID", &state.form.search)
                .on_input(|value| Message::ViewFieldChanged(ViewField::Search, value))
                .padding(6),
            button("POST view")
                .on_press(Message::SubmitView)
                .padding(10),
            row![
                text(&state.status).size(14),
                button("Dismiss").on_press(Message::DismissStatus).padding(4),
            ]
            .spacing(8),
            column![
                text("Field definitions").size(16),
                text("Zoom: clustering radius narrows as the zoom level rises.").size(12),
                text("Filter: authentication tier; wpa excludes wpa2 and wpa3.").size(12),
                text("Search: case-insensitive SSID/BSSID substring.").size(12),
            ]
            .spacing(4)
            .padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(360.0));

        let summary = if let Some(payload) = &state.payload {
            text(format!(
                "Networks: {} total, {} on map ({} rejected rows, {} failed sources)",
                payload.total_networks,
                payload.filtered_networks,
                payload.rows_rejected,
                payload.sources_failed
            ))
            .size(18)
        } else {
            text("Networks: n/a").size(18)
        };

        let cluster_canvas = Canvas::new(ClusterMap { plan: plan.clone() })
            .width(Length::Fill)
            .height(Length::Fixed(300.0));

        let histogram_canvas = Canvas::new(Histogram {
            buckets: analysis.signal_strength.clone(),
        })
        .width(Length::Fill)
        .height(Length::Fixed(160.0));

        let auth_entries = bucket_list(&analysis.authentication, "No authentication data");
        let channel_entries = bucket_list(&analysis.channels, "No channel data");

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let map_column = column![
            text("Survey").size(26),
            summary,
            text(format!("Cluster map (zoom {})", plan.zoom)).size(16),
            cluster_canvas,
            text("Signal strength histogram (|dBm|)").size(16),
            histogram_canvas,
            text("Authentication mix").size(16),
            Container::new(auth_entries).padding(6),
            text("Channel usage").size(16),
            Container::new(scrollable(channel_entries).height(Length::Fixed(90.0))).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![form_column, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn bucket_list(buckets: &[Bucket], empty_note: &str) -> Column<'static, Message> {
    if buckets.is_empty() {
        Column::new().push(text(empty_note.to_string()).size(12))
    } else {
        buckets
            .iter()
            .fold(Column::new().spacing(4), |col, bucket| {
                col.push(text(format!("{}: {}", bucket.label, bucket.count)).size(12))
            })
    }
}

async fn fetch_payload() -> Result<DashboardPayload, String> {
    let response = reqwest::get("http://127.0.0.1:9000/payload")
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<DashboardPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_view(view: ViewPayload) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:9000/view")
        .json(&view)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("View submitted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone)]
struct ViewForm {
    zoom: String,
    auth_filter: String,
    search: String,
}

impl Default for ViewForm {
    fn default() -> Self {
        Self {
            zoom: "7".into(),
            auth_filter: "all".into(),
            search: String::new(),
        }
    }
}

impl ViewForm {
    fn update_field(&mut self, field: ViewField, value: String) {
        match field {
            ViewField::Zoom => self.zoom = value,
            ViewField::AuthFilter => self.auth_filter = value,
            ViewField::Search => self.search = value,
        }
    }

    fn to_payload(&self) -> ViewPayload {
        ViewPayload {
            zoom: self.zoom.parse().ok(),
            auth_filter: self.auth_filter.trim().to_lowercase(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ViewPayload {
    zoom: Option<u8>,
    auth_filter: String,
    search: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AnalysisPayload {
    #[serde(default)]
    authentication: Vec<Bucket>,
    #[serde(default)]
    channels: Vec<Bucket>,
    #[serde(default)]
    signal_strength: Vec<Bucket>,
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardPayload {
    #[serde(default)]
    total_networks: usize,
    #[serde(default)]
    filtered_networks: usize,
    #[serde(default)]
    rows_rejected: usize,
    #[serde(default)]
    sources_failed: usize,
    #[serde(default)]
    analysis: AnalysisPayload,
    #[serde(default)]
    plan: RenderPlan,
}

impl DashboardPayload {
    fn has_data(&self) -> bool {
        self.total_networks > 0
    }
}

fn hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::from_rgb(0.9, 0.9, 0.9);
    }
    let parse = |range| u8::from_str_radix(&hex[range], 16).unwrap_or(230);
    Color::from_rgb8(parse(0..2), parse(2..4), parse(4..6))
}

#[derive(Clone)]
struct ClusterMap {
    plan: RenderPlan,
}

impl ClusterMap {
    /// Geographic extent of everything drawable, padded a little so
    /// edge markers stay inside the frame.
    fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        let lats = self
            .plan
            .glyphs
            .iter()
            .map(|g| g.latitude)
            .chain(self.plan.markers.iter().map(|m| m.latitude));
        let lngs = self
            .plan
            .glyphs
            .iter()
            .map(|g| g.longitude)
            .chain(self.plan.markers.iter().map(|m| m.longitude));

        let (mut south, mut north) = (f64::INFINITY, f64::NEG_INFINITY);
        for lat in lats {
            south = south.min(lat);
            north = north.max(lat);
        }
        let (mut west, mut east) = (f64::INFINITY, f64::NEG_INFINITY);
        for lng in lngs {
            west = west.min(lng);
            east = east.max(lng);
        }
        if !south.is_finite() || !west.is_finite() {
            return None;
        }
        let pad_lat = ((north - south) * 0.1).max(0.001);
        let pad_lng = ((east - west) * 0.1).max(0.001);
        Some((south - pad_lat, west - pad_lng, north + pad_lat, east + pad_lng))
    }
}

impl canvas::Program<Message> for ClusterMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.04),
        );

        let Some((south, west, north, east)) = self.extent() else {
            return vec![frame.into_geometry()];
        };
        let to_point = |latitude: f64, longitude: f64| {
            let x = ((longitude - west) / (east - west)) as f32 * bounds.width;
            let y = bounds.height - ((latitude - south) / (north - south)) as f32 * bounds.height;
            Point::new(x, y)
        };

        for glyph in &self.plan.glyphs {
            let center = to_point(glyph.latitude, glyph.longitude);
            let radius = glyph.size_px as f32 / 4.0;
            let circle = Path::new(|builder| builder.circle(center, radius));
            frame.fill(&circle, Color::from_rgb(0.40, 0.36, 0.78));
            frame.stroke(
                &circle,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::WHITE),
            );
        }

        for marker in &self.plan.markers {
            let center = to_point(marker.latitude, marker.longitude);
            let circle = Path::new(|builder| {
                builder.circle(center, marker.icon.size_px as f32 / 3.0)
            });
            frame.fill(&circle, hex_color(&marker.icon.color));
        }

        vec![frame.into_geometry()]
    }
}

#[derive(Clone)]
struct Histogram {
    buckets: Vec<Bucket>,
}

impl canvas::Program<Message> for Histogram {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        if self.buckets.is_empty() {
            return vec![frame.into_geometry()];
        }

        let max_count = self
            .buckets
            .iter()
            .map(|bucket| bucket.count)
            .max()
            .unwrap_or(1)
            .max(1) as f32;
        let slot = bounds.width / self.buckets.len() as f32;
        let bar_width = (slot * 0.8).max(1.0);

        for (index, bucket) in self.buckets.iter().enumerate() {
            let height = (bucket.count as f32 / max_count) * (bounds.height - 8.0);
            let x = index as f32 * slot + (slot - bar_width) / 2.0;
            frame.fill_rectangle(
                Point::new(x, bounds.height - height),
                iced::Size::new(bar_width, height),
                Color::from_rgb(0.18, 0.72, 0.89),
            );
        }

        vec![frame.into_geometry()]
    }
}
