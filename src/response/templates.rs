//! Built-in page templates.
//!
//! Both pages load the Google charting library and plot the history series.
//! The line-chart page labels rows by hour and slot; the timeline page uses
//! calendar timestamps and adds a gauge for the current reading.

use super::{Fragment, PageTemplate, SeriesStyle};

const ACTUATOR_FORM: &str = "<form method=get><input type=submit name=3 value='EIN'></form>\
<form method=get><input type=submit name=3 value='AUS'></form>";

/// Line chart of the last hour, labelled `H:I`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LineChartPage;

const LINE_CHART: &[Fragment] = &[
    Fragment::Text(
        "<!DOCTYPE HTML PUBLIC '-//W3C//DTD HTML 4.01 Transitional//EN'>\r\n\
<html><head>\r\n\
<title>MSP430 - Webserver</title>\r\n\
<script type='text/javascript' src='https://www.google.com/jsapi'></script>\r\n\
<script type='text/javascript'>\r\n\
google.load('visualization', '1', {packages:['corechart']});\r\n\
google.setOnLoadCallback(drawChart);\r\n\
function drawChart() {\r\n\
var data = google.visualization.arrayToDataTable([\r\n\
['Index', 'Temperatur 1'],\r\n",
    ),
    Fragment::Series,
    Fragment::Text(
        "]);\r\n\
var options = {title: 'Temperaturverlauf',vAxis:{title: 'Temperatur [&deg;C]', maxValue:50, minValue:-20},\
backgroundColor: {strokeWidth:2, fill:'#CCCCFF'}};\r\n\
var chart = new google.visualization.LineChart(document.getElementById('chart_div'));\r\n\
chart.draw(data, options);}\r\n\
</script>\r\n\
</head>\r\n\
<body bgcolor='#444444'>\r\n\
<br><hr />\r\n\
<h2><div align='left'><font color='#2076CD'> Webserver 1.0 </font></div></h2>\r\n\
<hr /><br>\r\n\
<div align='left'><font face='Verdana' color='#FFFFFF'>\r\n\
<p><b>Aktueller Temperaturwert:",
    ),
    Fragment::Temperature,
    Fragment::Text(" &deg;C</b></p>\r\n<p><b>Aktuelle Systemzeit:"),
    Fragment::Time,
    Fragment::Text(
        "</b></p>\r\n<br>\r\n\
<div align='left'><font face='Verdana' color='#FFFFFF'><b>LED schalten:</b></font></div>\r\n<br>",
    ),
    Fragment::Text(ACTUATOR_FORM),
    Fragment::Actuator,
    Fragment::Text(
        "\r\n<div id='chart_div' style='width: 800px; height: 400px;'></div>\r\n\
</font></div>\r\n</body></html>\r\n",
    ),
];

impl PageTemplate for LineChartPage {
    fn series_style(&self) -> SeriesStyle {
        SeriesStyle::Index
    }

    fn fragments(&self) -> &[Fragment] {
        LINE_CHART
    }

    fn actuator_text(&self, on: bool) -> &str {
        if on {
            "LED Ausgang: EIN"
        } else {
            "LED Ausgang: AUS"
        }
    }
}

/// Annotated timeline with calendar timestamps plus a gauge.
#[derive(Debug, Default, Copy, Clone)]
pub struct TimelinePage;

const TIMELINE: &[Fragment] = &[
    Fragment::Text(
        "<html><head>\r\n\
<title>MSP430 - Webserver</title>\r\n\
<script type='text/javascript' src='https://www.google.com/jsapi'></script>\r\n\
<script type='text/javascript'>\r\n\
google.load('visualization', '1', {packages:['annotatedtimeline']});\r\n\
google.setOnLoadCallback(drawChart);\r\n\
function drawChart() {\r\n\
var data = new google.visualization.DataTable();\r\n\
data.addColumn('datetime', 'Date');\r\n\
data.addColumn('number', 'Temperatur 1');\r\n\
data.addRows([\r\n",
    ),
    Fragment::Series,
    Fragment::Text(
        "]);\r\n\
var chart = new google.visualization.AnnotatedTimeLine(document.getElementById('chart_div'));\r\n\
chart.draw(data, {displayAnnotations: true, max:60, min:-20, allValuesSuffix:'&deg;C'});}\r\n\
</script>\r\n\
<script type='text/javascript'>\r\n\
google.load('visualization', '1', {packages:['gauge']});\r\n\
google.setOnLoadCallback(drawGauge);\r\n\
function drawGauge() {\r\n\
var data = google.visualization.arrayToDataTable([\r\n\
['Label', 'Value'],\r\n\
['Temp. 1',",
    ),
    Fragment::Temperature,
    Fragment::Text(
        "]\r\n]);\r\n\
var options = {width: 150, height: 150, redFrom: 40, redTo: 60, yellowFrom:10, yellowTo: 40, \
greenFrom: -20, greenTo: 10, min: -20, max: 60, minorTicks: 5};\r\n\
var chart = new google.visualization.Gauge(document.getElementById('chart_div2'));\r\n\
chart.draw(data, options);}\r\n\
</script>\r\n\
</head>\r\n\
<body>\r\n\
<p><b>Aktueller Temperaturwert:",
    ),
    Fragment::Temperature,
    Fragment::Text(" &deg;C</b></p>\r\n<p><b>Aktuelle Systemzeit:"),
    Fragment::Time,
    Fragment::Text("</b></p>\r\n<br>\r\n"),
    Fragment::Text(ACTUATOR_FORM),
    Fragment::Actuator,
    Fragment::Text(
        "\r\n<div id='chart_div' style='width: 800px; height: 400px;'></div>\r\n\
<br>\r\n<div id='chart_div2'></div>\r\n<br>\r\n</body></html>\r\n",
    ),
];

impl PageTemplate for TimelinePage {
    fn series_style(&self) -> SeriesStyle {
        SeriesStyle::DateTime
    }

    fn fragments(&self) -> &[Fragment] {
        TIMELINE
    }

    fn actuator_text(&self, on: bool) -> &str {
        if on { "Ausgang: EIN" } else { "Ausgang: AUS" }
    }
}
