pub const DOCUMENTATION_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>HealthMate Recommendation API</title>
<style>
body { font-family: sans-serif; max-width: 52rem; margin: 2rem auto; line-height: 1.5; }
code, pre { background: #f4f4f4; padding: 0.1rem 0.3rem; }
pre { padding: 0.75rem; overflow-x: auto; }
h2 { border-bottom: 1px solid #ddd; }
</style>
</head>
<body>
<h1>HealthMate Recommendation API</h1>
<p>All prediction endpoints accept a JSON object and return JSON. Every
response carries a <code>status</code> of <code>"success"</code> or
<code>"error"</code>; errors also carry an <code>error</code> message.</p>

<h2>POST /api/workout</h2>
<p>Required: <code>age</code>, <code>gender</code>, <code>bmi</code>,
<code>activity_level</code>, <code>health_condition</code>,
<code>duration_minutes</code>, <code>calories_burned</code>.</p>
<pre>{"age": 25, "gender": "Male", "bmi": 22.5, "activity_level": "Medium",
 "health_condition": "None", "duration_minutes": 45, "calories_burned": 300}</pre>
<p>Returns <code>recommended_workout</code>, <code>confidence</code> and
<code>top_recommendations</code> (<code>workout</code>, <code>confidence</code>).</p>

<h2>POST /api/lifestyle</h2>
<p>Required: <code>age</code>, <code>gender</code>, <code>sleep_hours</code>,
<code>recommended_sleep</code>, <code>water_intake_liters</code>,
<code>stress_level</code>, <code>screen_time_hours</code>.</p>
<pre>{"age": 30, "gender": "Female", "sleep_hours": 6.5, "recommended_sleep": 8.0,
 "water_intake_liters": 1.8, "stress_level": "Moderate", "screen_time_hours": 5.2}</pre>
<p>Returns <code>recommendation</code>, <code>confidence</code> and
<code>top_recommendations</code> (<code>recommendation</code>, <code>confidence</code>).</p>

<h2>POST /api/meal</h2>
<p>Required: <code>age</code>, <code>gender</code>, <code>bmi_status</code>,
<code>goal</code>, <code>meal_type</code>.</p>
<pre>{"age": 28, "gender": "Female", "bmi_status": "Normal", "goal": "Maintenance",
 "meal_type": "Lunch"}</pre>
<p>Returns <code>recommended_meal</code>, <code>estimated_calories</code>,
<code>confidence</code> and <code>top_recommendations</code>
(<code>meal</code>, <code>confidence</code>, <code>estimated_calories</code>).</p>

<h2>GET /api/health</h2>
<p>Reports which models are loaded:
<code>{"workout_model": true, "lifestyle_model": true, "meal_model": true, "status": "healthy"}</code></p>

<h2>Errors</h2>
<p>Every error body has the form <code>{"error": "...", "status": "error"}</code>.</p>
<ul>
<li><code>400</code>: a required field is missing or has the wrong type, or the body is not a JSON object.</li>
<li><code>200</code> with <code>"status": "error"</code>: the model is not available or the prediction failed.</li>
<li><code>404</code>: unknown endpoint.</li>
<li><code>405</code>: the endpoint exists but does not accept this method.</li>
<li><code>500</code>: unexpected server error.</li>
</ul>
</body>
</html>
"#;
